use std::fs;
use std::io::Read;

use anyhow::{bail, Context, Result};

/// Read an SDL schema from a file path, or stdin when the path is `-`.
pub fn read(path: &str) -> Result<String> {
    let sdl = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read schema from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read schema file `{path}`"))?
    };

    if sdl.trim().is_empty() {
        bail!("schema is empty");
    }
    Ok(sdl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_schema_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "type Query {{ x: Int }}").unwrap();

        let sdl = read(f.path().to_str().unwrap()).unwrap();
        assert!(sdl.contains("Query"));
    }

    #[test]
    fn empty_schema_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "   \n").unwrap();

        assert!(read(f.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = read("/no/such/schema.graphql").unwrap_err();
        assert!(err.to_string().contains("/no/such/schema.graphql"));
    }
}
