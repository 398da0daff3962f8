//! Random first names for name variables such as `{{Mary}}`.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Produces a replacement name for a name variable.
///
/// `seed` is the variable's default text. Implementations should return a
/// name of the same kind when they recognise the seed.
pub trait NameGenerator: Send + Sync {
    fn random_name(&self, seed: Option<&str>, rng: &mut dyn RngCore) -> String;
}

const BOY_NAMES: &[&str] = &[
    "Aaron", "Adam", "Alexander", "Andrew", "Anthony", "Benjamin", "Brandon", "Charles",
    "Christopher", "Daniel", "David", "Dylan", "Edward", "Eric", "Ethan", "Gabriel", "George",
    "Henry", "Isaac", "Jack", "Jacob", "James", "Jason", "John", "Jonathan", "Joseph", "Joshua",
    "Kevin", "Liam", "Logan", "Lucas", "Mark", "Matthew", "Michael", "Nathan", "Nicholas",
    "Noah", "Oliver", "Patrick", "Paul", "Peter", "Richard", "Robert", "Ryan", "Samuel",
    "Steven", "Thomas", "Timothy", "William", "Zachary",
];

const GIRL_NAMES: &[&str] = &[
    "Abigail", "Alice", "Amanda", "Amelia", "Anna", "Ashley", "Ava", "Charlotte", "Chloe",
    "Claire", "Elaine", "Elizabeth", "Ella", "Emily", "Emma", "Evelyn", "Grace", "Hannah",
    "Harper", "Isabella", "Jennifer", "Jessica", "Julia", "Karen", "Laura", "Lily", "Linda",
    "Lucy", "Madison", "Margaret", "Mary", "Mia", "Natalie", "Nora", "Olivia", "Patricia",
    "Rachel", "Rebecca", "Sarah", "Sofia", "Sophia", "Stephanie", "Susan", "Victoria",
    "Zoe",
];

/// Built-in tables of common English first names.
///
/// A seed found in one table yields a name from that table. Any other seed
/// yields a name from either.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameTable;

impl NameTable {
    pub fn is_boy_name(name: &str) -> bool {
        BOY_NAMES.contains(&name)
    }

    pub fn is_girl_name(name: &str) -> bool {
        GIRL_NAMES.contains(&name)
    }

    pub fn boy_name(rng: &mut dyn RngCore) -> &'static str {
        pick(BOY_NAMES, rng)
    }

    pub fn girl_name(rng: &mut dyn RngCore) -> &'static str {
        pick(GIRL_NAMES, rng)
    }
}

fn pick(table: &'static [&'static str], rng: &mut dyn RngCore) -> &'static str {
    table.choose(rng).copied().unwrap_or_default()
}

impl NameGenerator for NameTable {
    fn random_name(&self, seed: Option<&str>, rng: &mut dyn RngCore) -> String {
        let name = match seed {
            Some(seed) if Self::is_boy_name(seed) => Self::boy_name(rng),
            Some(seed) if Self::is_girl_name(seed) => Self::girl_name(rng),
            _ if rng.gen_bool(0.5) => Self::boy_name(rng),
            _ => Self::girl_name(rng),
        };
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_membership() {
        assert!(NameTable::is_girl_name("Mary"));
        assert!(!NameTable::is_girl_name("MaryAnneAnne"));
        assert!(NameTable::is_boy_name("Michael"));
        assert!(!NameTable::is_boy_name("MichaelSomething"));
    }

    #[test]
    fn test_tables_are_disjoint() {
        assert!(BOY_NAMES.iter().all(|name| !NameTable::is_girl_name(name)));
    }

    #[test]
    fn test_seed_keeps_table() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let boy = NameTable.random_name(Some("Michael"), &mut rng);
            assert!(NameTable::is_boy_name(&boy));
            let girl = NameTable.random_name(Some("Mary"), &mut rng);
            assert!(NameTable::is_girl_name(&girl));
        }
    }

    #[test]
    fn test_unknown_seed_gives_any_name() {
        let mut rng = StdRng::seed_from_u64(5);
        for seed in [None, Some("Zorblax")] {
            let name = NameTable.random_name(seed, &mut rng);
            assert!(NameTable::is_boy_name(&name) || NameTable::is_girl_name(&name));
        }
    }
}
