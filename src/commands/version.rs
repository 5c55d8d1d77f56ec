//! Version command handler

use anyhow::Result;

pub fn cmd_version(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        println!(
            "{}",
            serde_json::json!({ "event": "version", "version": version })
        );
    } else {
        println!("packdeploy {}", version);
    }
    Ok(())
}
