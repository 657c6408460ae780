//! Background policy for stacked sketches.
//!
//! Sketches are layered on top of each other, so an opaque background in one
//! would hide every layer beneath it. Processing's `background()` defaults a
//! missing alpha to opaque; the [`BackgroundPolicy::TransparentByDefault`]
//! policy instead appends a zero alpha whenever the caller did not pass one.
//!
//! Argument forms follow Processing's default color mode:
//!
//! | Arity | Meaning |
//! |-------|---------|
//! | 1 | gray |
//! | 2 | gray, alpha |
//! | 3 | red, green, blue |
//! | 4 | red, green, blue, alpha |

#[cfg(test)]
#[path = "background_test.rs"]
mod background_test;

use crate::consts::TRANSPARENT_ALPHA;

/// How a sketch's `background()` calls are rewritten before they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundPolicy {
    /// Arguments reach the runtime untouched.
    #[default]
    Passthrough,
    /// Calls without an alpha channel get a zero alpha appended.
    TransparentByDefault,
}

impl BackgroundPolicy {
    /// Rewrite a `background()` argument list according to the policy.
    #[must_use]
    pub fn apply(self, args: &[f64]) -> Vec<f64> {
        let mut out = args.to_vec();
        if self == Self::TransparentByDefault && lacks_alpha(args) {
            out.push(TRANSPARENT_ALPHA);
        }
        out
    }

    /// Decide what a script-side `background()` call forwards to the
    /// runtime. `args` are the raw positional slots; trailing absent slots
    /// were never passed. Only all-numeric calls are rewritten; a color
    /// object or image is forwarded as given.
    #[must_use]
    pub fn rewrite(self, args: &[BackgroundArg]) -> BackgroundCall {
        let given = args
            .iter()
            .rposition(|arg| !matches!(arg, BackgroundArg::Absent))
            .map_or(0, |last| last + 1);
        let numbers: Option<Vec<f64>> = args[..given]
            .iter()
            .map(|arg| match arg {
                BackgroundArg::Number(value) => Some(*value),
                BackgroundArg::Absent | BackgroundArg::Other => None,
            })
            .collect();
        match numbers {
            Some(numbers) => BackgroundCall::Numbers(self.apply(&numbers)),
            None => BackgroundCall::Forward(given),
        }
    }
}

/// One positional slot of a script-side `background()` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundArg {
    /// Not passed.
    Absent,
    Number(f64),
    /// A color object, an image, or anything else that is not a number.
    Other,
}

/// The call to make on the runtime's own `background()`.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundCall {
    /// Call with these numbers.
    Numbers(Vec<f64>),
    /// Call with the first `n` original arguments, untouched.
    Forward(usize),
}

/// True for the gray and rgb forms, which carry no alpha channel.
#[must_use]
pub fn lacks_alpha(args: &[f64]) -> bool {
    matches!(args.len(), 1 | 3)
}
