use std::fmt;
use std::str::FromStr;

/// National macro-region a prefecture belongs to.
///
/// Persisted by its Japanese label, parsed from either the label or the
/// English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    EasternJapan,
    Chubu,
    Kinki,
    WesternJapan,
}

const EASTERN_JAPAN: &[&str] = &[
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "山梨県", "長野県",
];

const CHUBU: &[&str] = &["富山県", "石川県", "福井県", "岐阜県", "静岡県", "愛知県", "三重県"];

const KINKI: &[&str] = &["滋賀県", "京都府", "大阪府", "兵庫県", "奈良県", "和歌山県"];

const WESTERN_JAPAN: &[&str] = &[
    "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

impl Region {
    pub const ALL: [Region; 4] = [
        Region::EasternJapan,
        Region::Chubu,
        Region::Kinki,
        Region::WesternJapan,
    ];

    /// The label stored in the `region` column.
    pub fn label(self) -> &'static str {
        match self {
            Region::EasternJapan => "東日本",
            Region::Chubu => "中部圏",
            Region::Kinki => "近畿圏",
            Region::WesternJapan => "西日本",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Region::EasternJapan => "Eastern Japan",
            Region::Chubu => "Central Japan",
            Region::Kinki => "Kinki",
            Region::WesternJapan => "Western Japan",
        }
    }

    pub fn prefectures(self) -> &'static [&'static str] {
        match self {
            Region::EasternJapan => EASTERN_JAPAN,
            Region::Chubu => CHUBU,
            Region::Kinki => KINKI,
            Region::WesternJapan => WESTERN_JAPAN,
        }
    }

    pub fn for_prefecture(prefecture: &str) -> Option<Region> {
        Self::ALL
            .into_iter()
            .find(|region| region.prefectures().contains(&prefecture))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region: {0}")]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|region| {
                region.label() == s
                    || region.english_name().eq_ignore_ascii_case(s)
                    || (*region == Region::Chubu && s.eq_ignore_ascii_case("Chubu"))
            })
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}
