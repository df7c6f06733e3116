//! Member search condition and its predicate composer.
//!
//! # Invariants
//! - Each condition field maps to at most one predicate.
//! - An absent field yields no predicate; never an always-true placeholder.
//! - Blank strings count as absent.

use super::expr::{Column, Predicate, Table};
use super::select::SelectQuery;

/// Optional filters for member search.
///
/// Built with consuming setters and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSearchCondition {
    username: Option<String>,
    team_name: Option<String>,
    age_goe: Option<i64>,
    age_loe: Option<i64>,
}

impl MemberSearchCondition {
    /// Condition with every field absent (matches all members).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a condition from optional parts, dropping blank strings.
    pub fn from_parts(
        username: Option<String>,
        team_name: Option<String>,
        age_goe: Option<i64>,
        age_loe: Option<i64>,
    ) -> Self {
        Self {
            username: username.filter(|value| has_text(value)),
            team_name: team_name.filter(|value| has_text(value)),
            age_goe,
            age_loe,
        }
    }

    /// Exact username match.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into()).filter(|value| has_text(value));
        self
    }

    /// Exact match on the member's team name.
    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into()).filter(|value| has_text(value));
        self
    }

    /// Minimum age, inclusive.
    pub fn age_goe(mut self, age: i64) -> Self {
        self.age_goe = Some(age);
        self
    }

    /// Maximum age, inclusive.
    pub fn age_loe(mut self, age: i64) -> Self {
        self.age_loe = Some(age);
        self
    }

    pub fn username_filter(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn team_name_filter(&self) -> Option<&str> {
        self.team_name.as_deref()
    }

    pub fn age_goe_filter(&self) -> Option<i64> {
        self.age_goe
    }

    pub fn age_loe_filter(&self) -> Option<i64> {
        self.age_loe
    }

    /// Number of fields that are present.
    pub fn present_field_count(&self) -> usize {
        [
            self.username.is_some(),
            self.team_name.is_some(),
            self.age_goe.is_some(),
            self.age_loe.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Emits one predicate per present condition field, in field order.
pub fn compose(condition: &MemberSearchCondition) -> Vec<Predicate> {
    [
        username_eq(condition.username_filter()),
        team_name_eq(condition.team_name_filter()),
        age_goe(condition.age_goe_filter()),
        age_loe(condition.age_loe_filter()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Folds [`compose`] output into a single conjunction.
pub fn compose_all(condition: &MemberSearchCondition) -> Option<Predicate> {
    Predicate::all(compose(condition))
}

/// Whether filtering by `condition` needs the `teams` join.
pub fn requires_team_join(condition: &MemberSearchCondition) -> bool {
    compose(condition)
        .iter()
        .any(|predicate| predicate.touches(Table::Team))
}

/// Count query for a paged member search.
///
/// Projects only `m.member_id` and joins `teams` only when a team filter is
/// present, so unfiltered counts stay on `members`.
pub fn member_count_query(condition: &MemberSearchCondition) -> SelectQuery {
    let query = SelectQuery::select([Column::MemberId]).filter(compose(condition));
    if requires_team_join(condition) {
        query.left_join_team()
    } else {
        query
    }
}

fn username_eq(username: Option<&str>) -> Option<Predicate> {
    username.map(|value| Column::MemberUsername.eq(value.to_string()))
}

fn team_name_eq(team_name: Option<&str>) -> Option<Predicate> {
    team_name.map(|value| Column::TeamName.eq(value.to_string()))
}

fn age_goe(age: Option<i64>) -> Option<Predicate> {
    age.map(|value| Column::MemberAge.goe(value))
}

fn age_loe(age: Option<i64>) -> Option<Predicate> {
    age.map(|value| Column::MemberAge.loe(value))
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{compose, compose_all, requires_team_join, MemberSearchCondition};
    use crate::query::expr::Column;

    #[test]
    fn empty_condition_composes_nothing() {
        let condition = MemberSearchCondition::new();
        assert!(compose(&condition).is_empty());
        assert!(compose_all(&condition).is_none());
        assert!(!requires_team_join(&condition));
    }

    #[test]
    fn predicate_count_matches_present_fields() {
        for mask in 0..16_u8 {
            let mut condition = MemberSearchCondition::new();
            if mask & 1 != 0 {
                condition = condition.username("member1");
            }
            if mask & 2 != 0 {
                condition = condition.team_name("teamA");
            }
            if mask & 4 != 0 {
                condition = condition.age_goe(10);
            }
            if mask & 8 != 0 {
                condition = condition.age_loe(40);
            }

            let predicates = compose(&condition);
            assert_eq!(predicates.len(), mask.count_ones() as usize, "mask={mask}");
            assert_eq!(predicates.len(), condition.present_field_count());
            assert_eq!(requires_team_join(&condition), mask & 2 != 0);
        }
    }


    #[test]
    fn blank_strings_are_treated_as_absent() {
        let condition = MemberSearchCondition::new().username("   ").team_name("");
        assert_eq!(condition.present_field_count(), 0);
        assert!(compose(&condition).is_empty());

        let from_parts =
            MemberSearchCondition::from_parts(Some("\t".to_string()), None, Some(3), None);
        assert_eq!(compose(&from_parts), vec![Column::MemberAge.goe(3_i64)]);
    }

    #[test]
    fn predicates_follow_field_order() {
        let condition = MemberSearchCondition::new()
            .age_loe(40)
            .age_goe(35)
            .team_name("teamB");
        assert_eq!(
            compose(&condition),
            vec![
                Column::TeamName.eq("teamB".to_string()),
                Column::MemberAge.goe(35_i64),
                Column::MemberAge.loe(40_i64),
            ]
        );
        assert!(requires_team_join(&condition));
    }

    #[test]
    fn compose_all_folds_into_one_conjunction() {
        let condition = MemberSearchCondition::new().username("member1").age_goe(5);
        let folded = compose_all(&condition).unwrap();
        assert_eq!(folded.leaf_count(), 2);
        assert_eq!(
            folded,
            Column::MemberUsername
                .eq("member1".to_string())
                .and(Column::MemberAge.goe(5_i64))
        );
    }
}
