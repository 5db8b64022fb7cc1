use anyhow::Result;
use dialoguer::Input;

/// Uses the id given on the command line, or asks for one until it parses.
pub fn item_id(given: Option<u64>, label: &str) -> Result<u64> {
    if let Some(id) = given {
        return Ok(id);
    }
    let id: u64 = Input::new().with_prompt(label).interact_text()?;
    Ok(id)
}
