use nucleo_matcher::Utf32String;
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};

/// A text-matching backend over a flat corpus of search strings.
///
/// Positions returned by [`search`](Matcher::search) index into the corpus
/// most recently given to [`index`](Matcher::index), which the caller keeps
/// aligned with its entry snapshot.
pub trait Matcher {
    /// Replaces the backend's corpus wholesale. Called on every reindex.
    fn index(&mut self, corpus: &[String]);

    /// Returns corpus positions matching `query`, in the backend's own
    /// relevance order.
    ///
    /// An empty query matches *nothing*, not everything; callers wanting the
    /// full list should read the snapshot directly instead of searching.
    fn search(&mut self, query: &str) -> Vec<usize>;
}

/// Plain containment matching, in corpus order.
pub struct SubstringMatcher {
    case_sensitive: bool,
    // Already lowercased when case-insensitive.
    corpus: Vec<String>,
}

impl SubstringMatcher {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            corpus: Vec::new(),
        }
    }
}

impl Matcher for SubstringMatcher {
    fn index(&mut self, corpus: &[String]) {
        self.corpus = if self.case_sensitive {
            corpus.to_vec()
        } else {
            corpus.iter().map(|s| s.to_lowercase()).collect()
        };
    }

    fn search(&mut self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return Vec::new();
        }

        let folded;
        let query = if self.case_sensitive {
            query
        } else {
            folded = query.to_lowercase();
            &folded
        };

        self.corpus
            .iter()
            .enumerate()
            .filter(|(_, text)| text.contains(query))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Approximate subsequence matching via nucleo, ranked by score. Always
/// case-insensitive.
pub struct FuzzyMatcher {
    matcher: nucleo_matcher::Matcher,
    corpus: Vec<Utf32String>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self {
            matcher: nucleo_matcher::Matcher::new(nucleo_matcher::Config::DEFAULT),
            corpus: Vec::new(),
        }
    }
}

impl Matcher for FuzzyMatcher {
    fn index(&mut self, corpus: &[String]) {
        self.corpus = corpus.iter().map(|s| Utf32String::from(s.as_str())).collect();
    }

    fn search(&mut self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return Vec::new();
        }

        let pattern = Pattern::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let mut scored: Vec<(u32, usize)> = self
            .corpus
            .iter()
            .enumerate()
            .filter_map(|(i, text)| {
                pattern
                    .score(text.slice(..), &mut self.matcher)
                    .map(|score| (score, i))
            })
            .collect();

        // Best score first; corpus order breaks ties.
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, i)| i).collect()
    }
}
