use crate::hero::Hero;

/// Case-insensitive substring search over superhero, alter ego and publisher.
///
/// Blank terms return the input unchanged. Order is always preserved.
pub fn filter_heroes(heroes: &[Hero], term: &str) -> Vec<Hero> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return heroes.to_vec();
    }

    heroes
        .iter()
        .filter(|hero| {
            [&hero.superhero, &hero.alter_ego, &hero.publisher]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::fixtures::{batman, hero, spiderman};

    fn roster() -> Vec<Hero> {
        vec![spiderman(), batman()]
    }

    #[test]
    fn test_matches_alter_ego() {
        let result = filter_heroes(&roster(), "par");
        assert_eq!(result, vec![spiderman()]);
    }

    #[test]
    fn test_matches_publisher_case_insensitive() {
        let result = filter_heroes(&roster(), "dc");
        assert_eq!(result, vec![batman()]);
    }

    #[test]
    fn test_matches_superhero_and_trims_term() {
        let result = filter_heroes(&roster(), "  BAT ");
        assert_eq!(result, vec![batman()]);
    }

    #[test]
    fn test_blank_term_returns_everything_in_order() {
        let heroes = roster();
        assert_eq!(filter_heroes(&heroes, ""), heroes);
        assert_eq!(filter_heroes(&heroes, "   \t"), heroes);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let heroes = vec![
            spiderman(),
            batman(),
            hero("marvel-daredevil", "Daredevil", "Matt Murdock", "Marvel"),
            hero("dc-robin", "Robin", "Dick Grayson", "DC"),
        ];

        for term in ["ar", "dc", "marvel", "zzz", ""] {
            let once = filter_heroes(&heroes, term);
            let twice = filter_heroes(&once, term);
            assert_eq!(once, twice, "term {term:?}");
        }
    }

    #[test]
    fn test_no_match() {
        assert!(filter_heroes(&roster(), "joker").is_empty());
    }
}
