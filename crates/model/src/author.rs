// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// One author on a reference record. Corporate authors are never split
/// into family/given parts — that loses information and BibTeX will
/// otherwise try to parse "European Commission" as a person named
/// Commission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    Person { family: String, given: Option<String> },
    Corporate(String),
}

impl Author {
    pub fn display_name(&self) -> String {
        match self {
            Author::Person { family, given: Some(g) } => format!("{g} {family}"),
            Author::Person { family, given: None } => family.clone(),
            Author::Corporate(name) => name.clone(),
        }
    }

    pub fn is_unknown_placeholder(&self) -> bool {
        matches!(self, Author::Person { family, given: None }
            if family.eq_ignore_ascii_case("unknown") || family.eq_ignore_ascii_case("anonymous"))
            || matches!(self, Author::Corporate(name)
                if name.eq_ignore_ascii_case("unknown") || name.eq_ignore_ascii_case("anonymous"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_unknown_and_anonymous() {
        assert!(Author::Person { family: "Unknown".into(), given: None }.is_unknown_placeholder());
        assert!(Author::Corporate("Anonymous".into()).is_unknown_placeholder());
        assert!(!Author::Corporate("European Commission".into()).is_unknown_placeholder());
    }
}
