use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Term count past which appending logs a warning. An expression this long
/// almost always means a caller is accumulating terms in a loop by mistake.
const TERM_WARN_THRESHOLD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Plus,
    Minus,
}

#[derive(Clone)]
enum Term {
    Known(f64),
    Ref(Futurable),
    MaxOf(Vec<Futurable>),
}

#[derive(Default)]
struct Expr {
    terms: Vec<(Sign, Term)>,
}

/// A numeric value that may be known now, known later, or an algebraic
/// combination of other deferred values.
///
/// `f64::INFINITY` encodes "not yet known". The expression lives behind a
/// shared, reference-counted cell: cloning a `Futurable` aliases the same
/// expression, and [`Futurable::assign`] on one handle is observed by every
/// expression that still references it. Resolution is lazy; reading
/// [`Futurable::value`] re-folds the expression, so there is no propagation
/// step when an unknown becomes known.
///
/// This aliasing is the contract that makes partially-unknown durations
/// composable: a sequence's duration holds references to its children's
/// durations, and a sound-driven child resolving its own duration makes the
/// sequence's value finite on the next read.
#[derive(Clone)]
pub struct Futurable {
    cell: Rc<RefCell<Expr>>,
}

impl Futurable {
    /// A value known up front.
    pub fn known(value: f64) -> Self {
        Self {
            cell: Rc::new(RefCell::new(Expr {
                terms: vec![(Sign::Plus, Term::Known(value))],
            })),
        }
    }

    /// A value that will only be resolved later (reads as `INFINITY`).
    pub fn unknown() -> Self {
        Self::known(f64::INFINITY)
    }

    /// The lazy maximum over `inputs`; unknown while any input is unknown.
    pub fn max_of<I>(inputs: I) -> Self
    where
        I: IntoIterator<Item = Futurable>,
    {
        Self {
            cell: Rc::new(RefCell::new(Expr {
                terms: vec![(Sign::Plus, Term::MaxOf(inputs.into_iter().collect()))],
            })),
        }
    }

    /// Append `rhs` as an added term. Returns a handle to the same
    /// expression so construction can be chained.
    ///
    /// Panics if `rhs` is, or currently references, this expression; a
    /// self-referential expression would never finish evaluating.
    pub fn add(&self, rhs: impl Into<Futurable>) -> Futurable {
        self.append(Sign::Plus, rhs.into())
    }

    /// Append `rhs` as a subtracted term. Same contract as [`Futurable::add`].
    pub fn subtract(&self, rhs: impl Into<Futurable>) -> Futurable {
        self.append(Sign::Minus, rhs.into())
    }

    /// Replace the whole expression with the single known term `value`.
    ///
    /// This is the resolution point: every other expression holding a
    /// reference to this cell sees the new value on its next `value()` read.
    /// Assigning `INFINITY` returns the cell to unknown.
    pub fn assign(&self, value: f64) {
        let mut expr = self.cell.borrow_mut();
        expr.terms.clear();
        expr.terms.push((Sign::Plus, Term::Known(value)));
    }

    /// Fold the expression. `INFINITY` means some term is still unresolved;
    /// a subtracted unknown makes the whole value unknown too (never `NaN`).
    pub fn value(&self) -> f64 {
        let expr = self.cell.borrow();
        let mut total = 0.0;
        for (sign, term) in &expr.terms {
            let v = match term {
                Term::Known(x) => *x,
                Term::Ref(f) => f.value(),
                Term::MaxOf(fs) => fs
                    .iter()
                    .map(Futurable::value)
                    .fold(0.0_f64, f64::max),
            };
            if v.is_infinite() {
                return f64::INFINITY;
            }
            total += match sign {
                Sign::Plus => v,
                Sign::Minus => -v,
            };
        }
        total
    }

    /// Whether the expression currently folds to a finite number.
    pub fn is_resolved(&self) -> bool {
        self.value().is_finite()
    }

    fn append(&self, sign: Sign, rhs: Futurable) -> Futurable {
        assert!(
            !rhs.references(self),
            "futurable expression may not reference itself"
        );
        let mut expr = self.cell.borrow_mut();
        expr.terms.push((sign, Term::Ref(rhs)));
        if expr.terms.len() > TERM_WARN_THRESHOLD {
            tracing::warn!(
                terms = expr.terms.len(),
                "futurable expression is unusually long; likely an upstream logic error"
            );
        }
        drop(expr);
        self.clone()
    }

    /// Identity check: does this expression reach `other`'s cell?
    fn references(&self, other: &Futurable) -> bool {
        if Rc::ptr_eq(&self.cell, &other.cell) {
            return true;
        }
        let expr = self.cell.borrow();
        expr.terms.iter().any(|(_, term)| match term {
            Term::Known(_) => false,
            Term::Ref(f) => f.references(other),
            Term::MaxOf(fs) => fs.iter().any(|f| f.references(other)),
        })
    }
}

impl Default for Futurable {
    fn default() -> Self {
        Self::unknown()
    }
}

impl From<f64> for Futurable {
    fn from(value: f64) -> Self {
        Self::known(value)
    }
}

impl From<&Futurable> for Futurable {
    fn from(value: &Futurable) -> Self {
        value.clone()
    }
}

impl fmt::Debug for Futurable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value();
        if v.is_finite() {
            write!(f, "Futurable({v})")
        } else {
            write!(f, "Futurable(unknown)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_value_folds_immediately() {
        assert_eq!(Futurable::known(42.0).value(), 42.0);
        assert!(!Futurable::unknown().is_resolved());
    }

    #[test]
    fn unresolved_term_poisons_the_sum_until_assigned() {
        let f1 = Futurable::unknown();
        let f2 = Futurable::known(3.0).add(&f1);
        assert_eq!(f2.value(), f64::INFINITY);

        f1.assign(2.0);
        assert_eq!(f2.value(), 5.0);

        f1.assign(f64::INFINITY);
        assert_eq!(f2.value(), f64::INFINITY);
    }

    #[test]
    fn subtracted_unknown_is_unknown_not_nan() {
        let a = Futurable::unknown();
        let b = Futurable::unknown().subtract(&a);
        assert_eq!(b.value(), f64::INFINITY);
        assert!(!b.value().is_nan());
    }

    #[test]
    fn subtraction_flips_sign_after_resolution() {
        let a = Futurable::unknown();
        let b = Futurable::known(10.0).subtract(&a);
        a.assign(4.0);
        assert_eq!(b.value(), 6.0);
    }

    #[test]
    fn assign_is_visible_through_every_alias() {
        let shared = Futurable::unknown();
        let left = Futurable::known(1.0).add(&shared);
        let right = Futurable::known(2.0).add(&shared);
        shared.assign(100.0);
        assert_eq!(left.value(), 101.0);
        assert_eq!(right.value(), 102.0);
    }

    #[test]
    fn max_of_resolves_when_the_last_input_does() {
        let a = Futurable::known(500.0);
        let b = Futurable::unknown();
        let m = Futurable::max_of([a.clone(), b.clone()]);
        assert!(!m.is_resolved());

        b.assign(1200.0);
        assert_eq!(m.value(), 1200.0);

        b.assign(10.0);
        assert_eq!(m.value(), 500.0);
    }

    #[test]
    #[should_panic(expected = "may not reference itself")]
    fn direct_self_reference_panics() {
        let f = Futurable::known(1.0);
        let alias = f.clone();
        f.add(&alias);
    }

    #[test]
    #[should_panic(expected = "may not reference itself")]
    fn indirect_self_reference_panics() {
        let a = Futurable::known(1.0);
        let b = Futurable::known(2.0).add(&a);
        a.add(&b);
    }

    #[test]
    fn long_expressions_warn_but_still_fold() {
        let f = Futurable::known(0.0);
        for _ in 0..150 {
            f.add(1.0);
        }
        assert_eq!(f.value(), 150.0);
    }
}
