//! Validation of user-supplied execution orders.
//!
//! An order override must be a permutation of the canonical names for its
//! context. [`check_order`] is shared by every assembler so all overrides are
//! held to the same rules and report the same errors.

use std::{collections::HashSet, fmt};

use thiserror::Error;

/// Segment an order override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderContext {
    PreCoupling,
    PostCoupling,
    Coupling,
}

impl fmt::Display for OrderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PreCoupling => "pre-coupling",
            Self::PostCoupling => "post-coupling",
            Self::Coupling => "coupling",
        })
    }
}

/// Errors returned by [`check_order`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// A name is not part of the canonical set.
    #[error("unrecognized {context} order entry `{name}`; valid entries are {valid:?}")]
    Unrecognized {
        context: OrderContext,
        name: String,
        valid: Vec<String>,
    },

    /// The override does not list exactly as many entries as the canonical set.
    #[error("{context} order has {found} entries, expected {expected}")]
    WrongLength {
        context: OrderContext,
        found: usize,
        expected: usize,
    },

    /// A name appears more than once.
    #[error("{context} order lists `{name}` more than once")]
    Duplicate { context: OrderContext, name: String },
}

/// Validates `candidate` against the `canonical` names for `context`.
///
/// Checks run in a fixed sequence: unknown names first, then length, then
/// duplicates. On success the candidate order is returned using the canonical
/// spellings, ready to drive placement.
///
/// # Errors
///
/// Returns the first [`OrderError`] found.
///
/// # Example
///
/// ```
/// use twine_coupling::support::order::{OrderContext, OrderError, check_order};
///
/// let canonical = ["aero", "struct"];
///
/// let order = check_order(OrderContext::PreCoupling, &["struct", "aero"], &canonical).unwrap();
/// assert_eq!(order, vec!["struct", "aero"]);
///
/// assert!(matches!(
///     check_order(OrderContext::PreCoupling, &["struct", "aero", "ldxfer"], &canonical),
///     Err(OrderError::Unrecognized { .. })
/// ));
/// ```
pub fn check_order<'c, S: AsRef<str>>(
    context: OrderContext,
    candidate: &[S],
    canonical: &[&'c str],
) -> Result<Vec<&'c str>, OrderError> {
    let mut order = Vec::with_capacity(candidate.len());

    for name in candidate {
        let name = name.as_ref();
        match canonical.iter().find(|c| **c == name) {
            Some(c) => order.push(*c),
            None => {
                return Err(OrderError::Unrecognized {
                    context,
                    name: name.to_owned(),
                    valid: canonical.iter().map(|c| (*c).to_owned()).collect(),
                });
            }
        }
    }

    if order.len() != canonical.len() {
        return Err(OrderError::WrongLength {
            context,
            found: order.len(),
            expected: canonical.len(),
        });
    }

    let mut seen = HashSet::with_capacity(order.len());
    if let Some(name) = order.iter().find(|name| !seen.insert(**name)) {
        return Err(OrderError::Duplicate {
            context,
            name: (*name).to_owned(),
        });
    }

    Ok(order)
}

/// Every ordering of `names`, for exhaustive order tests.
#[cfg(test)]
pub(crate) fn permutations<'a>(names: &[&'a str]) -> Vec<Vec<&'a str>> {
    if names.len() <= 1 {
        return vec![names.to_vec()];
    }

    let mut all = Vec::new();
    for (i, first) in names.iter().enumerate() {
        let mut rest = names.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, *first);
            all.push(tail);
        }
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUPLING: [&str; 5] = ["disp_xfer", "geo_disp", "aero", "load_xfer", "struct"];

    #[test]
    fn accepts_every_permutation() {
        let all = permutations(&COUPLING);
        assert_eq!(all.len(), 120);

        for candidate in all {
            let order =
                check_order(OrderContext::Coupling, candidate.as_slice(), &COUPLING).unwrap();
            assert_eq!(order, candidate);
        }
    }

    #[test]
    fn accepts_owned_names() {
        let candidate = vec![String::from("struct"), String::from("aero")];
        let order = check_order(
            OrderContext::PostCoupling,
            candidate.as_slice(),
            &["aero", "struct"],
        );
        assert_eq!(order, Ok(vec!["struct", "aero"]));
    }

    #[test]
    fn unrecognized_name_is_reported() {
        let err = check_order(
            OrderContext::PreCoupling,
            &["struct", "aero", "xfer"],
            &["aero", "struct"],
        )
        .unwrap_err();

        assert_eq!(
            err,
            OrderError::Unrecognized {
                context: OrderContext::PreCoupling,
                name: "xfer".into(),
                valid: vec!["aero".into(), "struct".into()],
            }
        );
    }

    #[test]
    fn unrecognized_is_checked_before_length() {
        let err = check_order(OrderContext::PreCoupling, &["ldxfer"], &["aero", "struct"]);
        assert!(matches!(err, Err(OrderError::Unrecognized { .. })));
    }

    #[test]
    fn wrong_length_is_reported() {
        assert_eq!(
            check_order(OrderContext::PreCoupling, &["aero"], &["aero", "struct"]),
            Err(OrderError::WrongLength {
                context: OrderContext::PreCoupling,
                found: 1,
                expected: 2,
            })
        );
        assert_eq!(
            check_order(
                OrderContext::PreCoupling,
                &["struct", "aero", "aero"],
                &["aero", "struct"]
            ),
            Err(OrderError::WrongLength {
                context: OrderContext::PreCoupling,
                found: 3,
                expected: 2,
            })
        );
    }

    #[test]
    fn duplicate_is_reported() {
        let candidate = ["disp_xfer", "geo_disp", "aero", "aero", "struct"];
        assert_eq!(
            check_order(OrderContext::Coupling, &candidate, &COUPLING),
            Err(OrderError::Duplicate {
                context: OrderContext::Coupling,
                name: "aero".into(),
            })
        );
    }

    #[test]
    fn empty_candidate_is_too_short() {
        let candidate: [&str; 0] = [];
        assert!(matches!(
            check_order(OrderContext::PostCoupling, &candidate, &["aero", "struct"]),
            Err(OrderError::WrongLength { found: 0, .. })
        ));
    }
}
