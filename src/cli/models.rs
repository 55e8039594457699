use std::io::Write;

use anyhow::Result;

use crate::debate::persona::AVAILABLE_MODELS;

pub fn write_models(out: &mut impl Write) -> Result<()> {
    for (label, id) in AVAILABLE_MODELS {
        writeln!(out, "{:<16} {}", label, id)?;
    }
    writeln!(out, "Any other model id supported by the API can be used as well.")?;
    Ok(())
}

pub fn run() -> Result<()> {
    write_models(&mut std::io::stdout())
}
