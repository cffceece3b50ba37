use super::{emitted, json_pretty, skipped, EXIT_SUCCESS};
use parvula_core::ComponentResolver;
use std::path::Path;

pub fn run(
    resolver: &ComponentResolver,
    package: &str,
    file: &Path,
    json: bool,
) -> Result<u8, String> {
    let installed = resolver
        .register_local(package, file)
        .map_err(|e| e.to_string())?;

    if json {
        println!(
            "{}",
            json_pretty(&serde_json::json!({
                "package": package,
                "installed": installed,
            }))?
        );
    } else if installed {
        println!("{} {package}", emitted("installed"));
    } else {
        println!("{package} {}", skipped("already present"));
    }
    Ok(EXIT_SUCCESS)
}
