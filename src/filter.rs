/// Selection of archive members by exact name.
///
/// An empty filter selects every entry. Otherwise each requested name can be
/// matched by at most one entry; once matched it is marked as used and later
/// entries with the same name are no longer selected by it. Names that were
/// never used can be collected once the archive has been walked.
#[derive(Clone, Debug, Default)]
pub struct NameFilter {
    requested: Vec<Requested>,
}

#[derive(Clone, Debug)]
struct Requested {
    name: String,
    used: bool,
}

impl NameFilter {
    /// Creates a filter over the given names, keeping their order.
    pub fn new<I, S>(names: I) -> NameFilter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NameFilter {
            requested: names
                .into_iter()
                .map(|name| Requested {
                    name: name.into(),
                    used: false,
                })
                .collect(),
        }
    }

    /// Returns whether no names were requested, i.e. everything is selected.
    pub fn is_empty(&self) -> bool {
        self.requested.is_empty()
    }

    /// Decides whether the entry called `name` is selected.
    ///
    /// On a match the first unused occurrence of `name` is consumed.
    pub fn select(&mut self, name: &[u8]) -> bool {
        if self.is_empty() {
            return true;
        }
        match self
            .requested
            .iter_mut()
            .find(|r| !r.used && r.name.as_bytes() == name)
        {
            Some(r) => {
                r.used = true;
                true
            }
            None => false,
        }
    }

    /// Returns the names that no entry matched, in request order.
    pub fn unmatched(&self) -> impl Iterator<Item = &str> + '_ {
        self.requested
            .iter()
            .filter(|r| !r.used)
            .map(|r| r.name.as_str())
    }
}
