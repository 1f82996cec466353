//! Roster ordering.
//!
//! The admin keeps a custom sequence of character ids. Characters the
//! sequence does not mention (new players) go after the ordered ones, sorted
//! by name.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::DomainError;
use crate::ids::UserId;

/// Anything that can be placed on the roster.
pub trait RosterItem {
    fn roster_id(&self) -> &UserId;
    fn roster_name(&self) -> &str;
}

/// Apply `order` to `characters`.
///
/// Every character appears exactly once in the result. Ids in `order` with no
/// matching character are skipped, as are repeated ids after their first
/// occurrence.
pub fn sort_characters<T>(characters: &[T], order: &[UserId]) -> Vec<T>
where
    T: RosterItem + Clone,
{
    let mut lookup: HashMap<&UserId, &T> = characters.iter().map(|c| (c.roster_id(), c)).collect();
    let mut sorted = Vec::with_capacity(lookup.len());

    for id in order {
        if let Some(character) = lookup.remove(id) {
            sorted.push(character.clone());
        }
    }

    let mut remaining: Vec<&T> = lookup.into_values().collect();
    remaining.sort_by(|a, b| {
        compare_names(a.roster_name(), b.roster_name())
            .then_with(|| a.roster_id().cmp(b.roster_id()))
    });
    sorted.extend(remaining.into_iter().cloned());
    sorted
}

/// Move the element at `from` to `to`, shifting the ones in between.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), DomainError> {
    let len = items.len();
    if from >= len {
        return Err(DomainError::OutOfRange { index: from, len });
    }
    if to >= len {
        return Err(DomainError::OutOfRange { index: to, len });
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// Name comparison for display: case and Latin accents are ignored first,
/// the raw strings break ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: UserId,
        name: String,
    }

    impl RosterItem for Entry {
        fn roster_id(&self) -> &UserId {
            &self.id
        }

        fn roster_name(&self) -> &str {
            &self.name
        }
    }

    fn entry(id: &str, name: &str) -> Entry {
        Entry {
            id: UserId::new(id).unwrap(),
            name: name.to_string(),
        }
    }

    fn ids(order: &[&str]) -> Vec<UserId> {
        order.iter().map(|s| UserId::new(*s).unwrap()).collect()
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn ordered_first_then_remaining_by_name() {
        let chars = vec![entry("c", "Carla"), entry("a", "Ana"), entry("b", "Bruno")];
        let result = sort_characters(&chars, &ids(&["c"]));
        assert_eq!(names(&result), ["Carla", "Ana", "Bruno"]);
    }

    #[test]
    fn empty_order_is_alphabetical() {
        let chars = vec![entry("1", "Zeca"), entry("2", "bia"), entry("3", "Álvaro")];
        let result = sort_characters(&chars, &[]);
        assert_eq!(names(&result), ["Álvaro", "bia", "Zeca"]);
    }

    #[test]
    fn stale_and_duplicate_ids_are_skipped() {
        let chars = vec![entry("a", "Ana"), entry("b", "Bruno")];
        let result = sort_characters(&chars, &ids(&["gone", "b", "b", "a"]));
        assert_eq!(names(&result), ["Bruno", "Ana"]);
    }

    #[test]
    fn every_character_appears_exactly_once() {
        let chars = vec![
            entry("a", "Ana"),
            entry("b", "Bruno"),
            entry("c", "Carla"),
            entry("d", "Davi"),
        ];
        let result = sort_characters(&chars, &ids(&["d", "x", "b"]));
        assert_eq!(result.len(), chars.len());
        for c in &chars {
            assert_eq!(result.iter().filter(|r| r.id == c.id).count(), 1);
        }
        assert_eq!(names(&result), ["Davi", "Bruno", "Ana", "Carla"]);
    }

    #[test]
    fn sorting_twice_is_idempotent() {
        let chars = vec![entry("c", "Carla"), entry("a", "Ana"), entry("b", "Bruno")];
        let order = ids(&["b"]);
        let once = sort_characters(&chars, &order);
        let twice = sort_characters(&once, &order);
        assert_eq!(once, twice);
    }

    #[test]
    fn equal_names_break_ties_by_id() {
        let chars = vec![entry("z", "Naruto"), entry("m", "Naruto")];
        let result = sort_characters(&chars, &[]);
        assert_eq!(result[0].id.as_str(), "m");
    }

    #[test]
    fn move_item_forward_and_back() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        move_item(&mut v, 0, 2).unwrap();
        assert_eq!(v, ['b', 'c', 'a', 'd']);
        move_item(&mut v, 3, 0).unwrap();
        assert_eq!(v, ['d', 'b', 'c', 'a']);
        move_item(&mut v, 1, 1).unwrap();
        assert_eq!(v, ['d', 'b', 'c', 'a']);
    }

    #[test]
    fn move_item_rejects_out_of_range() {
        let mut v = vec![1, 2];
        assert_eq!(
            move_item(&mut v, 2, 0),
            Err(DomainError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            move_item(&mut v, 0, 5),
            Err(DomainError::OutOfRange { index: 5, len: 2 })
        );
        assert_eq!(v, [1, 2]);
    }

    #[test]
    fn accents_and_case_do_not_split_the_alphabet() {
        assert_eq!(compare_names("Érica", "eduardo"), Ordering::Greater);
        assert_eq!(compare_names("ana", "Beto"), Ordering::Less);
        assert_eq!(compare_names("João", "Joao"), "João".cmp("Joao"));
    }
}
