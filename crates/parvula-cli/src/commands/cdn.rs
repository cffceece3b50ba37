use super::{emitted, json_pretty, skipped, warning, EXIT_FAILURE, EXIT_SUCCESS};
use parvula_core::{ComponentResolver, CoreError};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Loaded,
    Skipped,
    NotRegistered,
}

#[derive(Debug, Serialize)]
struct CdnResolution<'a> {
    package: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

pub fn run(
    resolver: &ComponentResolver,
    packages: &[String],
    register: &[(String, String)],
    json: bool,
) -> Result<u8, String> {
    for (name, url) in register {
        resolver.register_cdn(name, url);
    }

    let mut results = Vec::with_capacity(packages.len());
    for package in packages {
        let (status, url) = match resolver.load_from_cdn(package) {
            Ok(Some(url)) => (Status::Loaded, Some(url)),
            Ok(None) => (Status::Skipped, None),
            Err(CoreError::NotRegistered(_)) => (Status::NotRegistered, None),
            Err(e) => return Err(e.to_string()),
        };
        results.push(CdnResolution {
            package,
            status,
            url,
        });
    }

    if json {
        println!("{}", json_pretty(&results)?);
    } else {
        for r in &results {
            let shown = match (&r.status, &r.url) {
                (Status::Loaded, Some(url)) => emitted(url),
                (Status::NotRegistered, _) => warning("not registered"),
                _ => skipped("skipped"),
            };
            println!("{:<24} {shown}", r.package);
        }
    }

    let missing = results
        .iter()
        .any(|r| matches!(r.status, Status::NotRegistered));
    Ok(if missing { EXIT_FAILURE } else { EXIT_SUCCESS })
}
