use std::fmt;

/// A position within the folder list between the scan root and the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// 0 is the outermost folder
    FromStart(usize),
    /// 0 is the folder containing the file
    FromEnd(usize),
}

impl Position {
    fn pick<'a>(&self, folders: &'a [String]) -> Option<&'a String> {
        match *self {
            Position::FromStart(i) => folders.get(i),
            Position::FromEnd(i) => folders.len().checked_sub(i + 1).and_then(|idx| folders.get(idx)),
        }
    }
}

/// Tests a single folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    StartsWith(String),
    /// Exactly `n` characters, all alphabetic
    Alphabetic(usize),
    /// Case-insensitive membership
    OneOf(Vec<String>),
}

impl Predicate {
    pub fn one_of<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::OneOf(tokens.into_iter().map(|t| t.into().to_lowercase()).collect())
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Predicate::StartsWith(prefix) => name.starts_with(prefix.as_str()),
            Predicate::Alphabetic(len) => {
                name.chars().count() == *len && name.chars().all(char::is_alphabetic)
            }
            Predicate::OneOf(tokens) => {
                let lower = name.to_lowercase();
                tokens.iter().any(|t| *t == lower)
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::StartsWith(prefix) => write!(f, "starts with '{}'", prefix),
            Predicate::Alphabetic(len) => write!(f, "{} alphabetic characters", len),
            Predicate::OneOf(tokens) => write!(f, "one of {}", tokens.join("/")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Positional(Position),
    /// First folder satisfying the predicate. With `include_root`, the scan
    /// root's own name is tested before the relative folders.
    FirstMatch { predicate: Predicate, include_root: bool },
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Positional(Position::FromStart(i)) => write!(f, "folder #{} from the root", i + 1),
            Rule::Positional(Position::FromEnd(0)) => write!(f, "folder containing the file"),
            Rule::Positional(Position::FromEnd(i)) => write!(f, "folder #{} above the file", i + 1),
            Rule::FirstMatch { predicate, include_root } => {
                write!(f, "first folder that {}", predicate)?;
                if *include_root {
                    write!(f, " (root included)")?;
                }
                Ok(())
            }
        }
    }
}

/// A labelled rule producing one metadata column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRule {
    pub label: String,
    pub rule: Rule,
}

impl LabelRule {
    pub fn positional(label: impl Into<String>, position: Position) -> Self {
        Self {
            label: label.into(),
            rule: Rule::Positional(position),
        }
    }

    pub fn first_match(label: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            label: label.into(),
            rule: Rule::FirstMatch { predicate, include_root: false },
        }
    }

    pub fn including_root(mut self) -> Self {
        if let Rule::FirstMatch { include_root, .. } = &mut self.rule {
            *include_root = true;
        }
        self
    }

    /// Never fails; a rule that finds nothing yields `None`.
    pub fn infer(&self, root_name: Option<&str>, folders: &[String]) -> Option<String> {
        match &self.rule {
            Rule::Positional(position) => position.pick(folders).cloned(),
            Rule::FirstMatch { predicate, include_root } => {
                let root = root_name.filter(|_| *include_root);
                root.into_iter()
                    .chain(folders.iter().map(String::as_str))
                    .find(|name| predicate.matches(name))
                    .map(str::to_string)
            }
        }
    }
}

/// Labels inferred for one file, in rule order.
pub type Labels = Vec<(String, Option<String>)>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataInferencer {
    rules: Vec<LabelRule>,
}

impl MetadataInferencer {
    pub fn new(rules: Vec<LabelRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[LabelRule] {
        &self.rules
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.label.as_str())
    }

    pub fn infer(&self, root_name: Option<&str>, folders: &[String]) -> Labels {
        self.rules
            .iter()
            .map(|r| (r.label.clone(), r.infer(root_name, folders)))
            .collect()
    }
}
