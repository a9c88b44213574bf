//! # portal-cli -- Terminal front end for the banking portal
//!
//! ## Subcommands
//!
//! - `portal transfer` -- Interactive three-step fund transfer.
//! - `portal accounts` -- List funding accounts from the dashboard feed.
//! - `portal emi` -- Loan EMI and first-year amortization schedule.
//!
//! ```bash
//! PORTAL_SESSION_COOKIE='session=…' portal transfer --account 1234567890 --ifsc HDFC0000123 --amount 500
//! portal emi --principal 1000000 --rate 8.5 --tenure 240
//! ```
//!
//! Handlers take their input and output streams as parameters so they can
//! be driven by scripted input in tests.

pub mod accounts;
pub mod emi;
pub mod transfer;

use std::io::{BufRead, Write};

use portal_client::config::{parse_base_url, ConfigError};
use portal_client::PortalApiConfig;

/// The command completed.
pub const EXIT_OK: u8 = 0;
/// The transfer failed or was cancelled, or the command could not complete.
pub const EXIT_FAILED: u8 = 1;
/// Configuration could not be loaded.
pub const EXIT_CONFIG: u8 = 2;

/// Environment configuration with an optional `--base-url` override.
pub fn load_config(base_url: Option<&str>) -> Result<PortalApiConfig, ConfigError> {
    let mut config = PortalApiConfig::from_env()?;
    if let Some(raw) = base_url {
        config.base_url = parse_base_url("--base-url", raw)?;
    }
    Ok(config)
}

/// Write `label`, then read one trimmed line. `None` at end of input.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> std::io::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompt_trims_and_detects_eof() {
        let mut input = Cursor::new(b"  hello \n".to_vec());
        let mut out = Vec::new();
        assert_eq!(
            prompt(&mut input, &mut out, "Name: ").unwrap().as_deref(),
            Some("hello")
        );
        assert_eq!(prompt(&mut input, &mut out, "Again: ").unwrap(), None);
        assert!(String::from_utf8(out).unwrap().starts_with("Name: Again: "));
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(EXIT_OK, EXIT_FAILED);
        assert_ne!(EXIT_FAILED, EXIT_CONFIG);
    }
}
