//! Surah metadata catalog.
//!
//! Verse counts follow the Kufan numbering (6,236 ayat total).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Revelation {
    Meccan,
    Medinan,
}

#[derive(Debug, Clone, Serialize)]
pub struct Surah {
    pub number: u32,
    pub name: &'static str,
    pub arabic: &'static str,
    pub verses: u32,
    pub revelation: Revelation,
}

const fn surah(
    number: u32,
    name: &'static str,
    arabic: &'static str,
    verses: u32,
    revelation: Revelation,
) -> Surah {
    Surah {
        number,
        name,
        arabic,
        verses,
        revelation,
    }
}

pub static SURAHS: [Surah; 114] = [
    surah(1, "Al-Fatihah", "الفاتحة", 7, Revelation::Meccan),
    surah(2, "Al-Baqarah", "البقرة", 286, Revelation::Medinan),
    surah(3, "Aal Imran", "آل عمران", 200, Revelation::Medinan),
    surah(4, "An-Nisa", "النساء", 176, Revelation::Medinan),
    surah(5, "Al-Ma'idah", "المائدة", 120, Revelation::Medinan),
    surah(6, "Al-An'am", "الأنعام", 165, Revelation::Meccan),
    surah(7, "Al-A'raf", "الأعراف", 206, Revelation::Meccan),
    surah(8, "Al-Anfal", "الأنفال", 75, Revelation::Medinan),
    surah(9, "At-Tawbah", "التوبة", 129, Revelation::Medinan),
    surah(10, "Yunus", "يونس", 109, Revelation::Meccan),
    surah(11, "Hud", "هود", 123, Revelation::Meccan),
    surah(12, "Yusuf", "يوسف", 111, Revelation::Meccan),
    surah(13, "Ar-Ra'd", "الرعد", 43, Revelation::Medinan),
    surah(14, "Ibrahim", "إبراهيم", 52, Revelation::Meccan),
    surah(15, "Al-Hijr", "الحجر", 99, Revelation::Meccan),
    surah(16, "An-Nahl", "النحل", 128, Revelation::Meccan),
    surah(17, "Al-Isra", "الإسراء", 111, Revelation::Meccan),
    surah(18, "Al-Kahf", "الكهف", 110, Revelation::Meccan),
    surah(19, "Maryam", "مريم", 98, Revelation::Meccan),
    surah(20, "Taha", "طه", 135, Revelation::Meccan),
    surah(21, "Al-Anbya", "الأنبياء", 112, Revelation::Meccan),
    surah(22, "Al-Hajj", "الحج", 78, Revelation::Medinan),
    surah(23, "Al-Mu'minun", "المؤمنون", 118, Revelation::Meccan),
    surah(24, "An-Nur", "النور", 64, Revelation::Medinan),
    surah(25, "Al-Furqan", "الفرقان", 77, Revelation::Meccan),
    surah(26, "Ash-Shu'ara", "الشعراء", 227, Revelation::Meccan),
    surah(27, "An-Naml", "النمل", 93, Revelation::Meccan),
    surah(28, "Al-Qasas", "القصص", 88, Revelation::Meccan),
    surah(29, "Al-Ankabut", "العنكبوت", 69, Revelation::Meccan),
    surah(30, "Ar-Rum", "الروم", 60, Revelation::Meccan),
    surah(31, "Luqman", "لقمان", 34, Revelation::Meccan),
    surah(32, "As-Sajdah", "السجدة", 30, Revelation::Meccan),
    surah(33, "Al-Ahzab", "الأحزاب", 73, Revelation::Medinan),
    surah(34, "Saba", "سبأ", 54, Revelation::Meccan),
    surah(35, "Fatir", "فاطر", 45, Revelation::Meccan),
    surah(36, "Ya-Sin", "يس", 83, Revelation::Meccan),
    surah(37, "As-Saffat", "الصافات", 182, Revelation::Meccan),
    surah(38, "Sad", "ص", 88, Revelation::Meccan),
    surah(39, "Az-Zumar", "الزمر", 75, Revelation::Meccan),
    surah(40, "Ghafir", "غافر", 85, Revelation::Meccan),
    surah(41, "Fussilat", "فصلت", 54, Revelation::Meccan),
    surah(42, "Ash-Shuraa", "الشورى", 53, Revelation::Meccan),
    surah(43, "Az-Zukhruf", "الزخرف", 89, Revelation::Meccan),
    surah(44, "Ad-Dukhan", "الدخان", 59, Revelation::Meccan),
    surah(45, "Al-Jathiyah", "الجاثية", 37, Revelation::Meccan),
    surah(46, "Al-Ahqaf", "الأحقاف", 35, Revelation::Meccan),
    surah(47, "Muhammad", "محمد", 38, Revelation::Medinan),
    surah(48, "Al-Fath", "الفتح", 29, Revelation::Medinan),
    surah(49, "Al-Hujurat", "الحجرات", 18, Revelation::Medinan),
    surah(50, "Qaf", "ق", 45, Revelation::Meccan),
    surah(51, "Adh-Dhariyat", "الذاريات", 60, Revelation::Meccan),
    surah(52, "At-Tur", "الطور", 49, Revelation::Meccan),
    surah(53, "An-Najm", "النجم", 62, Revelation::Meccan),
    surah(54, "Al-Qamar", "القمر", 55, Revelation::Meccan),
    surah(55, "Ar-Rahman", "الرحمن", 78, Revelation::Medinan),
    surah(56, "Al-Waqi'ah", "الواقعة", 96, Revelation::Meccan),
    surah(57, "Al-Hadid", "الحديد", 29, Revelation::Medinan),
    surah(58, "Al-Mujadila", "المجادلة", 22, Revelation::Medinan),
    surah(59, "Al-Hashr", "الحشر", 24, Revelation::Medinan),
    surah(60, "Al-Mumtahanah", "الممتحنة", 13, Revelation::Medinan),
    surah(61, "As-Saf", "الصف", 14, Revelation::Medinan),
    surah(62, "Al-Jumu'ah", "الجمعة", 11, Revelation::Medinan),
    surah(63, "Al-Munafiqun", "المنافقون", 11, Revelation::Medinan),
    surah(64, "At-Taghabun", "التغابن", 18, Revelation::Medinan),
    surah(65, "At-Talaq", "الطلاق", 12, Revelation::Medinan),
    surah(66, "At-Tahrim", "التحريم", 12, Revelation::Medinan),
    surah(67, "Al-Mulk", "الملك", 30, Revelation::Meccan),
    surah(68, "Al-Qalam", "القلم", 52, Revelation::Meccan),
    surah(69, "Al-Haqqah", "الحاقة", 52, Revelation::Meccan),
    surah(70, "Al-Ma'arij", "المعارج", 44, Revelation::Meccan),
    surah(71, "Nuh", "نوح", 28, Revelation::Meccan),
    surah(72, "Al-Jinn", "الجن", 28, Revelation::Meccan),
    surah(73, "Al-Muzzammil", "المزمل", 20, Revelation::Meccan),
    surah(74, "Al-Muddaththir", "المدثر", 56, Revelation::Meccan),
    surah(75, "Al-Qiyamah", "القيامة", 40, Revelation::Meccan),
    surah(76, "Al-Insan", "الإنسان", 31, Revelation::Medinan),
    surah(77, "Al-Mursalat", "المرسلات", 50, Revelation::Meccan),
    surah(78, "An-Naba", "النبأ", 40, Revelation::Meccan),
    surah(79, "An-Nazi'at", "النازعات", 46, Revelation::Meccan),
    surah(80, "Abasa", "عبس", 42, Revelation::Meccan),
    surah(81, "At-Takwir", "التكوير", 29, Revelation::Meccan),
    surah(82, "Al-Infitar", "الانفطار", 19, Revelation::Meccan),
    surah(83, "Al-Mutaffifin", "المطففين", 36, Revelation::Meccan),
    surah(84, "Al-Inshiqaq", "الانشقاق", 25, Revelation::Meccan),
    surah(85, "Al-Buruj", "البروج", 22, Revelation::Meccan),
    surah(86, "At-Tariq", "الطارق", 17, Revelation::Meccan),
    surah(87, "Al-A'la", "الأعلى", 19, Revelation::Meccan),
    surah(88, "Al-Ghashiyah", "الغاشية", 26, Revelation::Meccan),
    surah(89, "Al-Fajr", "الفجر", 30, Revelation::Meccan),
    surah(90, "Al-Balad", "البلد", 20, Revelation::Meccan),
    surah(91, "Ash-Shams", "الشمس", 15, Revelation::Meccan),
    surah(92, "Al-Layl", "الليل", 21, Revelation::Meccan),
    surah(93, "Ad-Duhaa", "الضحى", 11, Revelation::Meccan),
    surah(94, "Ash-Sharh", "الشرح", 8, Revelation::Meccan),
    surah(95, "At-Tin", "التين", 8, Revelation::Meccan),
    surah(96, "Al-Alaq", "العلق", 19, Revelation::Meccan),
    surah(97, "Al-Qadr", "القدر", 5, Revelation::Meccan),
    surah(98, "Al-Bayyinah", "البينة", 8, Revelation::Medinan),
    surah(99, "Az-Zalzalah", "الزلزلة", 8, Revelation::Medinan),
    surah(100, "Al-Adiyat", "العاديات", 11, Revelation::Meccan),
    surah(101, "Al-Qari'ah", "القارعة", 11, Revelation::Meccan),
    surah(102, "At-Takathur", "التكاثر", 8, Revelation::Meccan),
    surah(103, "Al-Asr", "العصر", 3, Revelation::Meccan),
    surah(104, "Al-Humazah", "الهمزة", 9, Revelation::Meccan),
    surah(105, "Al-Fil", "الفيل", 5, Revelation::Meccan),
    surah(106, "Quraysh", "قريش", 4, Revelation::Meccan),
    surah(107, "Al-Ma'un", "الماعون", 7, Revelation::Meccan),
    surah(108, "Al-Kawthar", "الكوثر", 3, Revelation::Meccan),
    surah(109, "Al-Kafirun", "الكافرون", 6, Revelation::Meccan),
    surah(110, "An-Nasr", "النصر", 3, Revelation::Medinan),
    surah(111, "Al-Masad", "المسد", 5, Revelation::Meccan),
    surah(112, "Al-Ikhlas", "الإخلاص", 4, Revelation::Meccan),
    surah(113, "Al-Falaq", "الفلق", 5, Revelation::Meccan),
    surah(114, "An-Nas", "الناس", 6, Revelation::Meccan),
];

pub fn all() -> &'static [Surah] {
    &SURAHS
}

pub fn by_number(number: u32) -> Option<&'static Surah> {
    if (1..=114).contains(&number) {
        Some(&SURAHS[(number - 1) as usize])
    } else {
        None
    }
}

/// Case-insensitive match against the transliterated name.
pub fn search(query: &str) -> Vec<&'static Surah> {
    let needle = query.to_lowercase();
    SURAHS
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_complete() {
        assert_eq!(SURAHS.len(), 114);
        for (index, surah) in SURAHS.iter().enumerate() {
            assert_eq!(surah.number as usize, index + 1);
        }
    }

    #[test]
    fn test_total_verse_count() {
        let total: u32 = SURAHS.iter().map(|s| s.verses).sum();
        assert_eq!(total, 6236);
    }

    #[test]
    fn test_by_number() {
        let kahf = by_number(18).unwrap();
        assert_eq!(kahf.name, "Al-Kahf");
        assert_eq!(kahf.verses, 110);
        assert_eq!(kahf.revelation, Revelation::Meccan);

        assert!(by_number(0).is_none());
        assert!(by_number(115).is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let hits = search("KAHF");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, 18);
    }
}
