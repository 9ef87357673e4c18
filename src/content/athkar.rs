//! Athkar and dua catalogs. Static content; there is no upstream for these.

use chrono::{Datelike, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AthkarCategory {
    Morning,
    Evening,
    AfterPrayer,
    Sleep,
}

impl AthkarCategory {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "morning" => Some(Self::Morning),
            "evening" => Some(Self::Evening),
            "after-prayer" => Some(Self::AfterPrayer),
            "sleep" => Some(Self::Sleep),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
            Self::AfterPrayer => "after-prayer",
            Self::Sleep => "sleep",
        }
    }

    pub fn all() -> [Self; 4] {
        [Self::Morning, Self::Evening, Self::AfterPrayer, Self::Sleep]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dhikr {
    pub arabic: &'static str,
    pub transliteration: &'static str,
    pub translation: &'static str,
    pub repeat: u32,
    pub source: &'static str,
}

const MORNING: &[Dhikr] = &[
    Dhikr {
        arabic: "أَصْبَحْنَا وَأَصْبَحَ الْمُلْكُ لِلَّهِ وَالْحَمْدُ لِلَّهِ",
        transliteration: "Asbahna wa asbahal-mulku lillah, walhamdu lillah",
        translation: "We have reached the morning and the dominion belongs to Allah, and praise is to Allah.",
        repeat: 1,
        source: "Muslim 2723",
    },
    Dhikr {
        arabic: "اللَّهُمَّ بِكَ أَصْبَحْنَا وَبِكَ أَمْسَيْنَا وَبِكَ نَحْيَا وَبِكَ نَمُوتُ وَإِلَيْكَ النُّشُورُ",
        transliteration: "Allahumma bika asbahna wa bika amsayna, wa bika nahya wa bika namutu wa ilaykan-nushur",
        translation: "O Allah, by You we enter the morning and by You we enter the evening; by You we live and by You we die, and to You is the resurrection.",
        repeat: 1,
        source: "Tirmidhi 3391",
    },
    Dhikr {
        arabic: "سُبْحَانَ اللَّهِ وَبِحَمْدِهِ",
        transliteration: "Subhanallahi wa bihamdih",
        translation: "Glory is to Allah and praise is to Him.",
        repeat: 100,
        source: "Muslim 2692",
    },
    Dhikr {
        arabic: "اللَّهُمَّ إِنِّي أَسْأَلُكَ الْعَافِيَةَ فِي الدُّنْيَا وَالْآخِرَةِ",
        transliteration: "Allahumma inni as'alukal-'afiyah fid-dunya wal-akhirah",
        translation: "O Allah, I ask You for well-being in this world and the next.",
        repeat: 1,
        source: "Abu Dawud 5074",
    },
];

const EVENING: &[Dhikr] = &[
    Dhikr {
        arabic: "أَمْسَيْنَا وَأَمْسَى الْمُلْكُ لِلَّهِ وَالْحَمْدُ لِلَّهِ",
        transliteration: "Amsayna wa amsal-mulku lillah, walhamdu lillah",
        translation: "We have reached the evening and the dominion belongs to Allah, and praise is to Allah.",
        repeat: 1,
        source: "Muslim 2723",
    },
    Dhikr {
        arabic: "أَعُوذُ بِكَلِمَاتِ اللَّهِ التَّامَّاتِ مِنْ شَرِّ مَا خَلَقَ",
        transliteration: "A'udhu bikalimatillahit-tammati min sharri ma khalaq",
        translation: "I seek refuge in the perfect words of Allah from the evil of what He has created.",
        repeat: 3,
        source: "Muslim 2708",
    },
    Dhikr {
        arabic: "بِسْمِ اللَّهِ الَّذِي لَا يَضُرُّ مَعَ اسْمِهِ شَيْءٌ فِي الْأَرْضِ وَلَا فِي السَّمَاءِ",
        transliteration: "Bismillahil-ladhi la yadurru ma'asmihi shay'un fil-ardi wa la fis-sama'",
        translation: "In the name of Allah, with whose name nothing on earth or in heaven can cause harm.",
        repeat: 3,
        source: "Tirmidhi 3388",
    },
];

const AFTER_PRAYER: &[Dhikr] = &[
    Dhikr {
        arabic: "سُبْحَانَ اللَّهِ",
        transliteration: "Subhanallah",
        translation: "Glory is to Allah.",
        repeat: 33,
        source: "Muslim 596",
    },
    Dhikr {
        arabic: "الْحَمْدُ لِلَّهِ",
        transliteration: "Alhamdulillah",
        translation: "Praise is to Allah.",
        repeat: 33,
        source: "Muslim 596",
    },
    Dhikr {
        arabic: "اللَّهُ أَكْبَرُ",
        transliteration: "Allahu akbar",
        translation: "Allah is the greatest.",
        repeat: 34,
        source: "Muslim 596",
    },
    Dhikr {
        arabic: "آيَةُ الْكُرْسِيِّ",
        transliteration: "Ayat al-Kursi",
        translation: "The Verse of the Throne (Quran 2:255).",
        repeat: 1,
        source: "Nasa'i, Al-Kubra 9928",
    },
];

const SLEEP: &[Dhikr] = &[
    Dhikr {
        arabic: "بِاسْمِكَ اللَّهُمَّ أَمُوتُ وَأَحْيَا",
        transliteration: "Bismika Allahumma amutu wa ahya",
        translation: "In Your name, O Allah, I die and I live.",
        repeat: 1,
        source: "Bukhari 6324",
    },
    Dhikr {
        arabic: "اللَّهُمَّ قِنِي عَذَابَكَ يَوْمَ تَبْعَثُ عِبَادَكَ",
        transliteration: "Allahumma qini 'adhabaka yawma tab'athu 'ibadak",
        translation: "O Allah, protect me from Your punishment on the day You resurrect Your servants.",
        repeat: 3,
        source: "Abu Dawud 5045",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct Dua {
    pub occasion: &'static str,
    pub arabic: &'static str,
    pub translation: &'static str,
}

const DUAS: &[Dua] = &[
    Dua {
        occasion: "Guidance",
        arabic: "رَبَّنَا آتِنَا فِي الدُّنْيَا حَسَنَةً وَفِي الْآخِرَةِ حَسَنَةً وَقِنَا عَذَابَ النَّارِ",
        translation: "Our Lord, give us good in this world and good in the Hereafter, and protect us from the punishment of the Fire.",
    },
    Dua {
        occasion: "Steadfastness",
        arabic: "يَا مُقَلِّبَ الْقُلُوبِ ثَبِّتْ قَلْبِي عَلَى دِينِكَ",
        translation: "O Turner of hearts, make my heart firm upon Your religion.",
    },
    Dua {
        occasion: "Knowledge",
        arabic: "رَبِّ زِدْنِي عِلْمًا",
        translation: "My Lord, increase me in knowledge.",
    },
    Dua {
        occasion: "Parents",
        arabic: "رَبِّ ارْحَمْهُمَا كَمَا رَبَّيَانِي صَغِيرًا",
        translation: "My Lord, have mercy upon them as they brought me up when I was small.",
    },
    Dua {
        occasion: "Ease",
        arabic: "اللَّهُمَّ لَا سَهْلَ إِلَّا مَا جَعَلْتَهُ سَهْلًا",
        translation: "O Allah, there is no ease except what You make easy.",
    },
];

pub fn for_category(category: AthkarCategory) -> &'static [Dhikr] {
    match category {
        AthkarCategory::Morning => MORNING,
        AthkarCategory::Evening => EVENING,
        AthkarCategory::AfterPrayer => AFTER_PRAYER,
        AthkarCategory::Sleep => SLEEP,
    }
}

/// Deterministic daily rotation through the dua list.
pub fn daily_dua() -> &'static Dua {
    let day = Local::now().ordinal0() as usize;
    &DUAS[day % DUAS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_content() {
        for category in AthkarCategory::all() {
            assert!(!for_category(category).is_empty());
        }
    }

    #[test]
    fn test_after_prayer_tasbih_counts() {
        let items = for_category(AthkarCategory::AfterPrayer);
        let total: u32 = items.iter().take(3).map(|d| d.repeat).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_slug_roundtrip() {
        for category in AthkarCategory::all() {
            assert_eq!(AthkarCategory::from_slug(category.slug()), Some(category));
        }
        assert_eq!(AthkarCategory::from_slug("midnight"), None);
    }

    #[test]
    fn test_daily_dua_is_from_catalog() {
        let dua = daily_dua();
        assert!(DUAS.iter().any(|d| d.occasion == dua.occasion));
    }
}
