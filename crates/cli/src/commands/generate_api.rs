use anyhow::{bail, Context, Result};
use dump_template::{api_from_har, TemplateError};
use std::io::{self, Read, Write};

/// HAR capture on stdin, api file JSON on stdout.
pub fn run() -> Result<()> {
    let mut har = String::new();
    io::stdin()
        .read_to_string(&mut har)
        .context("Failed to read HAR from stdin")?;

    let api = match api_from_har(&har) {
        Ok(api) => api,
        Err(TemplateError::MissingCalls(missing)) => {
            for kind in &missing {
                eprintln!("{}", kind.capture_hint());
            }
            bail!(TemplateError::MissingCalls(missing));
        }
        Err(err) => return Err(err).context("Failed to import HAR"),
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", api.to_json_pretty()?)?;
    Ok(())
}
