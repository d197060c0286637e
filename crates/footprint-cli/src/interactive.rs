use anyhow::Result;
use dialoguer::MultiSelect;

/// Ask which uploaded areas to keep. All are preselected.
///
/// Returns the names left unchecked.
pub fn pick_excluded(names: &[String]) -> Result<Vec<String>> {
    let defaults = vec![true; names.len()];
    let kept = MultiSelect::new()
        .with_prompt("Areas to include (space to toggle, enter to confirm)")
        .items(names)
        .defaults(&defaults)
        .interact()?;

    Ok(names
        .iter()
        .enumerate()
        .filter(|(i, _)| !kept.contains(i))
        .map(|(_, name)| name.clone())
        .collect())
}
