use std::error::Error;

use crate::core::character::load_builtin_characters;

pub fn list_characters() -> Result<(), Box<dyn Error>> {
    println!("Available characters:\n");

    for character in load_builtin_characters() {
        println!("  • {} — {}", character.name, character.personality);
        println!("    {}", character.description);
    }

    println!("\n💡 Start a chat with:");
    println!("   chatelaine -c <name>");

    Ok(())
}
