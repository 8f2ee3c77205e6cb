//! md5crack - MD5 password recovery
//!
//! This crate provides functionality to:
//! - Compute MD5 digests with a from-scratch RFC 1321 implementation
//! - Build and query rainbow tables over fixed-length passwords
//! - Build and query a sorted digest index over a password list
//! - Brute force short passwords in parallel

pub mod constants;
pub mod error;
pub mod domain;
pub mod infra;
pub mod app;

// Re-export commonly used types
pub use app::brute_force::{brute_force, visit_all_passwords};
pub use app::dictionary::{build_index, lookup_index};
pub use app::generator::{build_table, build_table_file, gen_chains};
pub use app::searcher::{lookup, lookup_file};
pub use domain::alphabet::Alphabet;
pub use domain::chain::{Chain, Password, make_chain};
pub use domain::md5::{Digest, Md5, ParseDigestError, compute};
pub use domain::reduce::{ReduceFunction, make_reduce_functions};
pub use error::{Error, Result};

/// Run `$body` with `$n` bound to a runtime password length as a `const usize`
///
/// Only lengths 4 through 15 are supported; any other length evaluates to
/// `Err(Error::PasswordLength)`. `$body` must evaluate to a `Result`.
///
/// ```
/// use md5crack::{Alphabet, Result, with_password_length};
///
/// fn space(length: u8) -> Result<Option<u128>> {
///     let alphabet = Alphabet::new("01")?;
///     with_password_length!(length, N => Ok(alphabet.space(N)))
/// }
///
/// assert_eq!(space(8).unwrap(), Some(256));
/// assert!(space(3).is_err());
/// ```
#[macro_export]
macro_rules! with_password_length {
    (@arms $length:expr, $n:ident => $body:expr; $($len:literal)*) => {
        match $length {
            $(
                $len => {
                    const $n: usize = $len;
                    $body
                }
            )*
            other => Err($crate::Error::PasswordLength(other as usize)),
        }
    };
    ($length:expr, $n:ident => $body:expr) => {
        $crate::with_password_length!(@arms $length, $n => $body; 4 5 6 7 8 9 10 11 12 13 14 15)
    };
}
