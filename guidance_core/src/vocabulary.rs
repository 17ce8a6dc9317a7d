// Spoken phrase -> detector label lookup for voice-started searches.
// Ordered, first match wins: a phrase that contains another must be listed before it.

use serde::{Deserialize, Serialize};

/// One spoken phrase and the canonical label it selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub phrase: String,
    pub label: String,
}

/// A label the user asked for, and the phrase that matched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub phrase: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LabelVocabulary {
    entries: Vec<VocabularyEntry>,
}

impl LabelVocabulary {
    pub fn from_pairs<P, L>(pairs: impl IntoIterator<Item = (P, L)>) -> Self
    where
        P: Into<String>,
        L: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(phrase, label)| VocabularyEntry {
                phrase: phrase.into().to_lowercase(),
                label: label.into(),
            })
            .filter(|entry| !entry.phrase.is_empty())
            .collect();
        LabelVocabulary { entries }
    }

    /// First entry whose phrase occurs in the utterance, ignoring case.
    pub fn resolve(&self, utterance: &str) -> Option<ResolvedItem> {
        let utterance = utterance.to_lowercase();
        self.entries
            .iter()
            .find(|entry| utterance.contains(&entry.phrase))
            .map(|entry| ResolvedItem {
                phrase: entry.phrase.clone(),
                label: entry.label.clone(),
            })
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vocabulary of the custom household-items detector.
    pub fn custom_russian() -> Self {
        LabelVocabulary::from_pairs(CUSTOM_RU.iter().copied())
    }

    /// Vocabulary of the COCO detector.
    pub fn coco_russian() -> Self {
        LabelVocabulary::from_pairs(COCO_RU.iter().copied())
    }
}

/// Built-in vocabularies selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyKind {
    #[default]
    CustomRussian,
    CocoRussian,
}

impl VocabularyKind {
    pub fn build(self) -> LabelVocabulary {
        match self {
            VocabularyKind::CustomRussian => LabelVocabulary::custom_russian(),
            VocabularyKind::CocoRussian => LabelVocabulary::coco_russian(),
        }
    }
}

// Misrecognized aliases ("включи", "верная ручка") are deliberate.
const CUSTOM_RU: &[(&str, &str)] = &[
    ("выключатель", "Light switch"),
    ("ключи", "Keys"),
    ("ключ", "Keys"),
    ("включи", "Keys"),
    ("очки", "Glasses"),
    ("шапка", "Knitted hat"),
    ("шляпа", "Hat"),
    ("белая трость", "White cane"),
    ("кепка", "Cap"),
    ("дверная ручка", "Door handle"),
    ("верная ручка", "Door handle"),
    ("перчатки", "Glove"),
    ("перчатка", "Glove"),
    ("сушилка для рук", "Hand dryer"),
    ("розетка", "Power plugs and sockets"),
    ("отвёртка", "Screwdriver"),
    ("кран", "Tap"),
    ("кошелек", "Wallet"),
    ("бумажник", "Wallet"),
    ("туалетная бумага", "Toilet paper"),
];

const COCO_RU: &[(&str, &str)] = &[
    ("человек", "person"),
    ("велосипед", "bicycle"),
    ("машина", "car"),
    ("автомобиль", "car"),
    ("мотоцикл", "motorbike"),
    ("самолёт", "aeroplane"),
    ("автобус", "bus"),
    ("поезд", "train"),
    ("грузовик", "truck"),
    ("лодка", "boat"),
    ("светофор", "traffic light"),
    ("гидрант", "fire hydrant"),
    ("знак стоп", "stop sign"),
    ("парковочный счётчик", "parking meter"),
    ("скамейка", "bench"),
    ("скамья", "bench"),
    ("птица", "bird"),
    ("кошка", "cat"),
    ("кот", "cat"),
    ("собака", "dog"),
    ("пёс", "dog"),
    ("лошадь", "horse"),
    ("овца", "sheep"),
    ("корова", "cow"),
    ("слон", "elephant"),
    ("медведь", "bear"),
    ("зебра", "zebra"),
    ("жираф", "giraffe"),
    ("рюкзак", "backpack"),
    ("зонтик", "umbrella"),
    ("зонт", "umbrella"),
    ("сумочка", "handbag"),
    ("сумка", "handbag"),
    ("галстук", "tie"),
    ("чемодан", "suitcase"),
    ("кейс", "suitcase"),
    ("фризби", "frisbee"),
    ("лыжи", "skis"),
    ("сноуборд", "snowboard"),
    ("мяч", "sports ball"),
    ("воздушный змей", "kite"),
    ("бейсбольная перчатка", "baseball glove"),
    ("убита", "baseball bat"),
    ("убито", "baseball bat"),
    ("бита", "baseball bat"),
    ("скейтборд", "skateboard"),
    ("доска для сёрфинга", "surfboard"),
    ("теннисная ракетка", "tennis racket"),
    ("бутылка", "bottle"),
    ("бокал", "wine glass"),
    ("кружка", "cup"),
    ("крошка", "cup"),
    ("чашка", "cup"),
    ("вилка", "fork"),
    ("ножницы", "scissors"),
    ("нож", "knife"),
    ("наш", "knife"),
    ("ложка", "spoon"),
    ("чаша", "bowl"),
    ("банан", "banana"),
    ("яблоко", "apple"),
    ("сэндвич", "sandwich"),
    ("апельсин", "orange"),
    ("мандарин", "orange"),
    ("брокколи", "broccoli"),
    ("морковка", "carrot"),
    ("морковь", "carrot"),
    ("хот дог", "hot dog"),
    ("пицца", "pizza"),
    ("пончик", "donut"),
    ("бублик", "donut"),
    ("торт", "cake"),
    ("пирог", "cake"),
    ("кресло", "chair"),
    ("диван", "sofa"),
    ("растение в горшке", "pottedplant"),
    ("растения в горшке", "pottedplant"),
    ("кровать", "bed"),
    ("стол", "dining table"),
    ("унитаз", "toilet"),
    ("туалет", "toilet"),
    ("телевизор", "tv"),
    ("монитор", "tv"),
    ("ноутбук", "laptop"),
    ("мышь", "mouse"),
    ("пульт", "remote"),
    ("клавиатура", "keyboard"),
    ("телефон", "cell phone"),
    ("микроволновая", "microwave"),
    ("микроволновка", "microwave"),
    ("печь", "oven"),
    ("духовка", "oven"),
    ("тостер", "toaster"),
    ("раковина", "sink"),
    ("холодильник", "refrigerator"),
    ("книга", "book"),
    ("часы", "clock"),
    ("ваза", "vase"),
    ("плюшевый мишка", "teddy bear"),
    ("фен", "hair drier"),
    ("зубная щетка", "toothbrush"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins_in_list_order() {
        let vocab = LabelVocabulary::from_pairs([("red cup", "mug"), ("cup", "cup")]);
        assert_eq!(vocab.resolve("find the Red Cup please").unwrap().label, "mug");
        assert_eq!(vocab.resolve("a cup").unwrap().label, "cup");
        assert!(vocab.resolve("a plate").is_none());
    }

    #[test]
    fn aliases_share_a_label() {
        let vocab = LabelVocabulary::custom_russian();
        let resolved = vocab.resolve("найди бумажник").unwrap();
        assert_eq!(resolved.label, "Wallet");
        assert_eq!(resolved.phrase, "бумажник");
    }

    #[test]
    fn longer_phrase_shadows_its_prefix() {
        let vocab = LabelVocabulary::coco_russian();
        assert_eq!(vocab.resolve("где ножницы").unwrap().label, "scissors");
        assert_eq!(vocab.resolve("где нож").unwrap().label, "knife");
        assert_eq!(
            vocab.resolve("бейсбольная перчатка").unwrap().label,
            "baseball glove"
        );
    }

    #[test]
    fn every_builtin_phrase_reaches_its_label() {
        for vocab in [LabelVocabulary::custom_russian(), LabelVocabulary::coco_russian()] {
            for entry in vocab.entries() {
                let resolved = vocab.resolve(&entry.phrase).unwrap();
                assert_eq!(
                    resolved.label, entry.label,
                    "\"{}\" shadowed by \"{}\"",
                    entry.phrase, resolved.phrase
                );
            }
        }
    }

    #[test]
    fn light_switch_is_not_taken_for_keys() {
        let vocab = LabelVocabulary::custom_russian();
        assert_eq!(vocab.resolve("найди выключатель").unwrap().label, "Light switch");
        assert_eq!(vocab.resolve("найди ключ").unwrap().label, "Keys");
    }

    #[test]
    fn empty_phrases_are_skipped() {
        let vocab = LabelVocabulary::from_pairs([("", "anything")]);
        assert!(vocab.is_empty());
        assert!(vocab.resolve("whatever").is_none());
    }

    #[test]
    fn kinds_build_their_tables() {
        assert_eq!(VocabularyKind::CocoRussian.build().len(), COCO_RU.len());
        assert_eq!(VocabularyKind::default().build().len(), CUSTOM_RU.len());
    }
}
