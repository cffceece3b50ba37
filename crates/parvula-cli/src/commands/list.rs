use super::{json_pretty, skipped, EXIT_SUCCESS};
use parvula_core::ComponentResolver;

pub fn run(resolver: &ComponentResolver, json: bool) -> Result<u8, String> {
    let packages = resolver.installed().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&packages)?);
    } else if packages.is_empty() {
        println!("no components found");
    } else {
        println!("{:<24} MAIN", "NAME");
        for pkg in &packages {
            let main = pkg
                .main
                .clone()
                .unwrap_or_else(|| skipped("(no manifest)"));
            println!("{:<24} {main}", pkg.name);
        }
    }
    Ok(EXIT_SUCCESS)
}
