//! Resolve command - show canonical forms and fingerprints

use anyhow::Result;
use dataset_registry_domain::canonical_source;
use serde::Serialize;

use crate::args::ResolveArgs;

/// Exit status when at least one input does not resolve
const EXIT_UNRESOLVABLE: i32 = 2;

#[derive(Debug, Serialize)]
struct Resolved<'a> {
    input: &'a str,
    kind: Option<&'static str>,
    canonical: Option<String>,
    fingerprint: Option<String>,
}

pub async fn execute(args: ResolveArgs) -> Result<()> {
    let resolved: Vec<Resolved<'_>> = args
        .sources
        .iter()
        .map(|input| match canonical_source(input) {
            Some(source) => Resolved {
                input,
                kind: Some(source.kind().as_str()),
                fingerprint: Some(source.fingerprint().to_string()),
                canonical: Some(source.into_string()),
            },
            None => Resolved {
                input,
                kind: None,
                canonical: None,
                fingerprint: None,
            },
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        for r in &resolved {
            match (&r.canonical, &r.fingerprint, r.kind) {
                (Some(canonical), Some(fingerprint), Some(kind)) => {
                    println!("{}\t{}\t{}\t{}", fingerprint, kind, canonical, r.input);
                }
                _ => println!("-\tunresolvable\t-\t{}", r.input),
            }
        }
    }

    if resolved.iter().any(|r| r.canonical.is_none()) {
        std::process::exit(EXIT_UNRESOLVABLE);
    }

    Ok(())
}
