//! Policy snippet retrieval.
//!
//! The advisor only needs "relevant policy text for a leave type". How that
//! text is found is behind [`PolicyRetriever`]; [`PolicyKnowledgeBase`] adds
//! caching on top and is constructed explicitly by whoever owns the advisor.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::model::leave_type::{
    ANNUAL_LEAVE, BEREAVEMENT_LEAVE, COMPENSATORY_REST, MARRIAGE_LEAVE, MATERNITY_LEAVE,
    PERSONAL_LEAVE, SICK_LEAVE,
};

pub mod cache;

pub use cache::PolicyKnowledgeBase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySnippet {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl PolicySnippet {
    pub fn new(title: &str, content: &str, category: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
        }
    }
}

pub trait PolicyRetriever: Send + Sync {
    /// Up to `k` snippets, most relevant first.
    fn search(&self, query: &str, k: usize) -> impl Future<Output = Vec<PolicySnippet>> + Send;
}

/// Retriever for deployments with no policy documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRetriever;

impl PolicyRetriever for NoopRetriever {
    async fn search(&self, _query: &str, _k: usize) -> Vec<PolicySnippet> {
        Vec::new()
    }
}

/// Keyword retriever over a fixed set of handbook snippets.
#[derive(Debug, Clone)]
pub struct HandbookRetriever {
    snippets: Vec<PolicySnippet>,
}

impl Default for HandbookRetriever {
    fn default() -> Self {
        Self::new(default_handbook())
    }
}

impl HandbookRetriever {
    pub fn new(snippets: Vec<PolicySnippet>) -> Self {
        Self { snippets }
    }

    /// Title hits weigh twice as much as hits in the body.
    fn score(snippet: &PolicySnippet, terms: &[String]) -> usize {
        let title = snippet.title.to_lowercase();
        let content = snippet.content.to_lowercase();
        terms
            .iter()
            .map(|term| {
                let in_title = usize::from(title.contains(term.as_str()));
                let in_content = usize::from(content.contains(term.as_str()));
                2 * in_title + in_content
            })
            .sum()
    }

    fn mentions(snippet: &PolicySnippet, term: &str) -> bool {
        snippet.title.to_lowercase().contains(term) || snippet.content.to_lowercase().contains(term)
    }

    /// Terms found in at most half of the handbook, or the common ones when no
    /// other term matches anything.
    fn distinctive_terms(&self, terms: Vec<String>) -> Vec<String> {
        let limit = self.snippets.len() / 2;
        let (rare, common): (Vec<(String, usize)>, Vec<(String, usize)>) = terms
            .into_iter()
            .map(|term| {
                let hits = self.snippets.iter().filter(|s| Self::mentions(s, &term)).count();
                (term, hits)
            })
            .filter(|(_, hits)| *hits > 0)
            .partition(|(_, hits)| *hits <= limit);

        let chosen = if rare.is_empty() { common } else { rare };
        chosen.into_iter().map(|(term, _)| term).collect()
    }
}

/// Lowercased query words of three or more characters.
fn query_terms(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= 3)
        .map(str::to_lowercase)
        .collect()
}

impl PolicyRetriever for HandbookRetriever {
    async fn search(&self, query: &str, k: usize) -> Vec<PolicySnippet> {
        if k == 0 {
            return Vec::new();
        }
        let terms = self.distinctive_terms(query_terms(query));
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &PolicySnippet)> = self
            .snippets
            .iter()
            .map(|snippet| (Self::score(snippet, &terms), snippet))
            .filter(|(score, _)| *score > 0)
            .collect();
        // stable sort keeps handbook order between equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(k)
            .map(|(_, snippet)| snippet.clone())
            .collect()
    }
}

pub fn default_handbook() -> Vec<PolicySnippet> {
    vec![
        PolicySnippet::new(
            ANNUAL_LEAVE,
            "Employees with at least one year of service receive paid annual leave: \
             5 days after 1 to 10 years, 10 days after 10 to 20 years and 15 days beyond 20 years. \
             Apply 3 working days in advance; whole or half days may be taken.",
            "leave",
        ),
        PolicySnippet::new(
            SICK_LEAVE,
            "Sick leave requires a hospital visit certificate; absences longer than 3 days \
             require a diagnosis certificate.",
            "leave",
        ),
        PolicySnippet::new(
            PERSONAL_LEAVE,
            "Personal leave is unpaid, must be requested 1 working day in advance and may not \
             exceed 15 days in a calendar year.",
            "leave",
        ),
        PolicySnippet::new(
            MARRIAGE_LEAVE,
            "Employees receive 3 days of paid marriage leave, to be used within one year of \
             registering the marriage.",
            "leave",
        ),
        PolicySnippet::new(
            MATERNITY_LEAVE,
            "Maternity leave is 98 days, extended by 15 days for a difficult birth and by 15 days \
             for each additional infant.",
            "leave",
        ),
        PolicySnippet::new(
            BEREAVEMENT_LEAVE,
            "Bereavement leave is 3 paid days for a parent, spouse or child and 1 paid day for \
             other relatives.",
            "leave",
        ),
        PolicySnippet::new(
            COMPENSATORY_REST,
            "Overtime approved by a department head earns compensatory rest at 1:1, or 1:2 for \
             public holidays. Compensatory rest must be used within 3 months of the overtime and \
             lapses otherwise.",
            "overtime",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn best_match_comes_first() {
        let hits = HandbookRetriever::default().search("Compensatory rest", 2).await;
        assert_eq!(hits[0].title, COMPENSATORY_REST);
        assert!(hits.len() <= 2);
    }

    #[tokio::test]
    async fn annual_query_prefers_annual_snippet() {
        let hits = HandbookRetriever::default().search("annual leave", 3).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, ANNUAL_LEAVE);
    }

    #[tokio::test]
    async fn common_word_does_not_pull_in_other_leave_types() {
        let handbook = HandbookRetriever::default();
        for name in [PERSONAL_LEAVE, SICK_LEAVE, MATERNITY_LEAVE] {
            let titles: Vec<String> = handbook
                .search(name, 2)
                .await
                .into_iter()
                .map(|s| s.title)
                .collect();
            assert_eq!(titles, vec![name.to_string()]);
        }
    }

    #[tokio::test]
    async fn common_word_alone_still_matches() {
        let hits = HandbookRetriever::default().search("leave", 3).await;
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, ANNUAL_LEAVE);
    }

    #[tokio::test]
    async fn title_match_outranks_body_mention() {
        let handbook = HandbookRetriever::new(vec![
            PolicySnippet::new(
                "Overtime",
                "Overtime needs sign-off from a department head.",
                "pay",
            ),
            PolicySnippet::new(
                "Public holidays",
                "Overtime on public holidays pays double.",
                "pay",
            ),
            PolicySnippet::new("Remote work", "Remote days are agreed with the team lead.", "work"),
        ]);
        let hits = handbook.search("overtime", 2).await;
        assert_eq!(hits[0].title, "Overtime");
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn unrelated_or_empty_queries_return_nothing() {
        let handbook = HandbookRetriever::default();
        assert!(handbook.search("xylophone", 5).await.is_empty());
        assert!(handbook.search("  ", 5).await.is_empty());
        assert!(handbook.search("annual", 0).await.is_empty());
    }

    #[tokio::test]
    async fn noop_is_always_empty() {
        assert!(NoopRetriever.search("annual leave", 5).await.is_empty());
    }

    #[test]
    fn short_words_are_ignored() {
        assert_eq!(query_terms("Sick of it, ok?"), vec!["sick".to_string()]);
    }
}
