pub mod span;

pub use span::*;

use std::fmt;

pub type Id = String;

pub fn format_vec<T: fmt::Display>(
    f: &mut fmt::Formatter,
    v: &[T],
    left: &str,
    sep: &str,
    right: &str,
) -> fmt::Result {
    write!(f, "{}", left)?;
    if let Some((first, rest)) = v.split_first() {
        write!(f, "{}", first)?;
        for e in rest {
            write!(f, "{}{}", sep, e)?;
        }
    }
    write!(f, "{}", right)
}

pub use fnv::FnvHashMap as Map;
pub use fnv::FnvHashSet as Set;

pub use fnv::FnvBuildHasher as Hasher;

// sorted copy of a set, for deterministic iteration
pub fn sorted<T: Ord + Clone + std::hash::Hash>(s: &Set<T>) -> Vec<T> {
    let mut v: Vec<_> = s.iter().cloned().collect();
    v.sort();
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Wrap(Vec<i32>);

    impl fmt::Display for Wrap {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            format_vec(f, &self.0, "(", ", ", ")")
        }
    }

    #[test]
    fn format_list() {
        assert_eq!(Wrap(vec![]).to_string(), "()");
        assert_eq!(Wrap(vec![1]).to_string(), "(1)");
        assert_eq!(Wrap(vec![1, 2, 3]).to_string(), "(1, 2, 3)");
    }

    #[test]
    fn sorted_set() {
        let s: Set<_> = ["b", "c", "a"].iter().map(|x| x.to_string()).collect();
        assert_eq!(sorted(&s), vec!["a", "b", "c"]);
    }
}
