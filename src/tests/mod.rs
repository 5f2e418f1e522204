//! Cross-module tests that exercise the public `Engine` facade end to end,
//! as opposed to the per-module unit tests living next to their code.

mod properties;
mod reentrancy;
