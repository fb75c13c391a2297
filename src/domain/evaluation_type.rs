use serde::{Serialize, Serializer};

/// The kind of audit an evaluation row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EvaluationType {
    PreRetrofit,
    PostRetrofit,
    Incentive,
}

impl EvaluationType {
    pub const ALL: [EvaluationType; 3] = [
        EvaluationType::PreRetrofit,
        EvaluationType::PostRetrofit,
        EvaluationType::Incentive,
    ];

    /// The single-letter code used in the extract's `EVAL_TYPE` column.
    pub fn code(&self) -> &'static str {
        match self {
            EvaluationType::PreRetrofit => "D",
            EvaluationType::PostRetrofit => "E",
            EvaluationType::Incentive => "F",
        }
    }

    pub fn from_code(code: &str) -> Option<EvaluationType> {
        Self::ALL.into_iter().find(|kind| kind.code() == code.trim())
    }

    pub fn codes() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(|kind| kind.code())
    }
}

impl Serialize for EvaluationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
