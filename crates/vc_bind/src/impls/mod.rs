//! [`Bind`](crate::decl::Bind) implementations of std types, and helpers for
//! writing implementations by hand.
//!
//! - [`concat`]: string concatenation for generic type paths.
//! - [`GenericTypePathCell`]: storage of generic type paths.
//!
//! ## Implemented Menu
//!
//! - primitives: `bool`, `char`, `i8`-`i64`, `isize`, `u8`-`u64`, `usize`,
//!   `f32`, `f64`, and `String`.
//! - bridges: `Duration` (`u64` nanoseconds), `SystemTime` (`i64`
//!   nanoseconds since the Unix epoch), `PathBuf` (`String`).
//! - wrappers: `Option<T>`, `Box<T>`.
//! - sequences: `Vec<T>`, `VecDeque<T>`, `[T; N]`.
//! - sets: `BTreeSet<T>`, `std::collections::HashSet<T>`,
//!   `vc_utils::hash::HashSet<T>`.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod primitive;
mod sequence;
mod set;
mod std_types;
mod wrapper;

// -----------------------------------------------------------------------------
// Exports

pub use cell::GenericTypePathCell;

use alloc::string::String;

/// An efficient string concatenation function.
///
/// # Example
///
/// ```
/// use vc_bind::impls;
///
/// let s = impls::concat(&["alloc::vec::Vec", "<", "u8", ">"]);
/// assert_eq!(s, "alloc::vec::Vec<u8>");
/// assert_eq!(s.capacity(), 19);
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> String {
    let len = arr.iter().map(|item| item.len()).sum();
    let mut res = String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}
