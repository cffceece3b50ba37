use super::{emitted, json_pretty, skipped, EXIT_SUCCESS};
use parvula_core::ComponentResolver;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    package: &'a str,
    uri: Option<String>,
}

pub fn run(
    resolver: &ComponentResolver,
    packages: &[String],
    cdn: &[(String, String)],
    json: bool,
) -> Result<u8, String> {
    for (name, url) in cdn {
        resolver.register_cdn(name, url);
    }

    let results: Vec<_> = packages
        .iter()
        .map(|arg| {
            let (package, path) = match arg.split_once('=') {
                Some((package, path)) => (package, Some(path)),
                None => (arg.as_str(), None),
            };
            Resolution {
                package,
                uri: resolver.load(package, path),
            }
        })
        .collect();

    if json {
        println!("{}", json_pretty(&results)?);
    } else {
        for r in &results {
            match &r.uri {
                Some(uri) => println!("{:<24} {}", r.package, emitted(uri)),
                None => println!("{:<24} {}", r.package, skipped("skipped")),
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
