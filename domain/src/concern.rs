use serde::{Deserialize, Serialize};

/// A skin concern the user can pick in the first wizard step.
///
/// Variant order is catalog order; sets of concerns iterate in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Concern {
    Dryness,
    Spots,
    Acne,
    Pores,
    Wrinkles,
    Sagging,
    Sensitive,
}

/// Display entry of the concern catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConcernInfo {
    pub id: Concern,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CONCERNS: [ConcernInfo; 7] = [
    ConcernInfo {
        id: Concern::Dryness,
        name: "乾燥",
        description: "肌のかさつき・つっぱり感",
    },
    ConcernInfo {
        id: Concern::Spots,
        name: "シミ・そばかす",
        description: "色素沈着・くすみ",
    },
    ConcernInfo {
        id: Concern::Acne,
        name: "ニキビ",
        description: "吹き出物・肌荒れ",
    },
    ConcernInfo {
        id: Concern::Pores,
        name: "毛穴",
        description: "毛穴の開き・黒ずみ",
    },
    ConcernInfo {
        id: Concern::Wrinkles,
        name: "しわ",
        description: "小じわ・表情じわ",
    },
    ConcernInfo {
        id: Concern::Sagging,
        name: "たるみ",
        description: "フェイスラインの緩み",
    },
    ConcernInfo {
        id: Concern::Sensitive,
        name: "敏感肌",
        description: "赤み・かゆみ・刺激に弱い",
    },
];

impl Concern {
    pub const ALL: [Concern; 7] = [
        Concern::Dryness,
        Concern::Spots,
        Concern::Acne,
        Concern::Pores,
        Concern::Wrinkles,
        Concern::Sagging,
        Concern::Sensitive,
    ];

    pub fn info(self) -> &'static ConcernInfo {
        // CONCERNS is laid out in variant order.
        &CONCERNS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// The lowercase wire tag, e.g. `"dryness"`.
    pub fn tag(self) -> &'static str {
        match self {
            Concern::Dryness => "dryness",
            Concern::Spots => "spots",
            Concern::Acne => "acne",
            Concern::Pores => "pores",
            Concern::Wrinkles => "wrinkles",
            Concern::Sagging => "sagging",
            Concern::Sensitive => "sensitive",
        }
    }
}

/// Display names joined with `sep`, in the iteration order of `concerns`.
pub fn join_names<I>(concerns: I, sep: &str) -> String
where
    I: IntoIterator<Item = Concern>,
{
    concerns
        .into_iter()
        .map(Concern::name)
        .collect::<Vec<_>>()
        .join(sep)
}
