use anyhow::{Context, Result};
use tracing::info;

use md5crack::constants::PASSWORD_DELIMITER;
use md5crack::{build_index, lookup_index};

use crate::{Dictionary, Index, report};

pub fn index(args: Index) -> Result<()> {
    let count = build_index(&args.password_file, &args.index_file, PASSWORD_DELIMITER)
        .with_context(|| {
            format!(
                "Unable to index '{}' into '{}'",
                args.password_file.display(),
                args.index_file.display()
            )
        })?;

    info!(passwords = count, "Index complete");
    Ok(())
}

pub fn dictionary(args: Dictionary) -> Result<()> {
    let password = lookup_index(
        &args.password_file,
        &args.index_file,
        &args.hash,
        PASSWORD_DELIMITER,
    )
    .context("Unable to search the dictionary index")?;

    report(password);
    Ok(())
}
