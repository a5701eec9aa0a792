//! Standard builtin modules.
//!
//! | Module   | Contents                                         |
//! |----------|--------------------------------------------------|
//! | `math`   | arithmetic over [`Number`](super::number::Number) and `f64` transcendental functions |
//! | `ops`    | comparisons and list subscripting; the targets of the operator aliases |
//! | `string` | string construction, inspection and regex helpers |

pub mod math;
pub mod ops;
pub mod string;

use super::dispatch::Registry;

/// Register every standard module.
pub fn register_all(registry: &mut Registry) {
    math::register(registry);
    ops::register(registry);
    string::register(registry);
}

#[cfg(test)]
pub(crate) fn call(name: &str, args: &[&str]) -> Result<String, crate::error::DispatchError> {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    Registry::standard().invoke(name, &args)
}
