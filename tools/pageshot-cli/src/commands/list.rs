//! Preview the pages a folder would produce.

use std::path::PathBuf;

use pageshot_common::config::AssembleDefaults;
use pageshot_ordering::list_images;

pub fn run(dir: PathBuf, ext: Option<String>, defaults: &AssembleDefaults) -> anyhow::Result<()> {
    let extension = ext.unwrap_or_else(|| defaults.image_extension.clone());
    if !dir.is_dir() {
        println!("No folder selected: {} is not a directory", dir.display());
        return Ok(());
    }

    let files = list_images(&dir, &extension);
    for (index, name) in files.names().iter().enumerate() {
        println!("{:>5}  {name}", index + 1);
    }
    println!(
        "{} {} file(s)",
        files.len(),
        extension.trim_start_matches('.').to_uppercase()
    );
    Ok(())
}
