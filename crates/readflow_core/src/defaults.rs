//! crates/readflow_core/src/defaults.rs
//!
//! The built-in collections used whenever a store slot is absent or
//! unreadable. The curriculum seed is the stock Ayurveda syllabus the
//! application ships with.

use crate::domain::{
    Badge, BadgeCondition, Chapter, Goal, GoalPeriod, GoalUnit, Subject,
};
use crate::syllabus::SyllabusState;
use uuid::Uuid;

pub fn default_goals() -> Vec<Goal> {
    vec![
        Goal {
            id: Uuid::new_v4(),
            title: "Read for 30 minutes".to_string(),
            target: 30,
            current: 0,
            unit: GoalUnit::Minutes,
            period: GoalPeriod::Daily,
            completed: false,
            reminder_time: Some("18:00".to_string()),
            subject: None,
        },
        Goal {
            id: Uuid::new_v4(),
            title: "Read 20 Pages".to_string(),
            target: 20,
            current: 0,
            unit: GoalUnit::Pages,
            period: GoalPeriod::Daily,
            completed: false,
            reminder_time: None,
            subject: None,
        },
        Goal {
            id: Uuid::new_v4(),
            title: "Finish 1 Book".to_string(),
            target: 1,
            current: 0,
            unit: GoalUnit::Pages,
            period: GoalPeriod::Weekly,
            completed: false,
            reminder_time: None,
            subject: None,
        },
    ]
}

pub fn default_badges() -> Vec<Badge> {
    vec![
        Badge {
            id: "seven-day-streak".to_string(),
            name: "7 Day Streak".to_string(),
            description: "Read for 7 days in a row".to_string(),
            icon: "flame".to_string(),
            unlocked: false,
            color: "orange".to_string(),
            condition: BadgeCondition::StreakThreshold(7),
        },
        Badge {
            id: "speed-demon".to_string(),
            name: "Speed Demon".to_string(),
            description: "Reach 300 WPM".to_string(),
            icon: "zap".to_string(),
            unlocked: false,
            color: "violet".to_string(),
            condition: BadgeCondition::WpmThreshold(300),
        },
        Badge {
            id: "bookworm".to_string(),
            name: "Bookworm".to_string(),
            description: "Read 1000 Pages".to_string(),
            icon: "book".to_string(),
            unlocked: false,
            color: "emerald".to_string(),
            condition: BadgeCondition::PagesThreshold(1000),
        },
    ]
}

fn ch(id: &str, title: &str) -> Chapter {
    Chapter::new(id, title)
}

fn subject(name: &str, color: &str, chapters: Vec<Chapter>) -> Subject {
    Subject {
        name: name.to_string(),
        color: color.to_string(),
        chapters,
    }
}

pub fn default_syllabus() -> SyllabusState {
    let dravyaguna = subject(
        "Dravyaguna",
        "emerald",
        vec![
            // Basic principles
            ch("dg1", "Dravya"),
            ch("dg2", "Guna"),
            ch("dg3", "Rasa"),
            ch("dg4", "Vipaka"),
            ch("dg5", "Virya"),
            ch("dg6", "Prabhava"),
            ch("dg7", "Interrelation of Rasa-Guna-Virya-Vipaka-Prabhava"),
            ch("dg8", "Karma"),
            ch("dg9", "Principles of General Pharmacology"),
            ch("dg10", "Karmas of Dashemani Gana"),
            ch("dg11", "Mishraka Gana"),
            ch("dg12", "Nomenclature of Dravya"),
            ch("dg13", "Prashasta Bheshaja & Bheshaja Pariksha"),
            ch("dg14", "Dravyasangrahana & Drug Collection (GFCP)"),
            ch("dg15", "GCP, Seed Bank, RET Plants"),
            ch("dg16", "Abhava Pratinidhi Dravya (Substitutes)"),
            ch("dg17", "Extract Techniques (Aqueous & Alcoholic)"),
            ch("dg18", "Adverse Drug Reaction & Pharmacovigilance"),
            ch("dg19", "Regulatory Bodies (NMPB, CCRAS, API, GCTM, PCIMH)"),
            ch("dg20", "Vrikshayurveda & Ethnomedicine"),
            ch("dg21", "Network Pharmacology & Bioinformatics"),
            // Detailed drugs
            ch("dg22", "Amalaki"),
            ch("dg23", "Aragwadha"),
            ch("dg24", "Arjuna"),
            ch("dg25", "Ashoka"),
            ch("dg26", "Ashwagandha"),
            ch("dg27", "Ativisha"),
            ch("dg28", "Bala"),
            ch("dg29", "Beejaka"),
            ch("dg30", "Bhallataka"),
            ch("dg31", "Bharangi"),
            ch("dg32", "Bhrungaraja"),
            ch("dg33", "Bhumyamalaki"),
            ch("dg34", "Bilva"),
            ch("dg35", "Brahmi"),
            ch("dg36", "Chandana"),
            ch("dg37", "Chitraka"),
            ch("dg38", "Dadima"),
            ch("dg39", "Dhataki"),
            ch("dg40", "Dhamasa"),
            ch("dg41", "Eranda"),
            ch("dg42", "Gokshura"),
            ch("dg43", "Guduchi"),
            ch("dg44", "Guggulu"),
            ch("dg45", "Haridra"),
            ch("dg46", "Haritaki"),
            ch("dg47", "Hingu"),
            ch("dg48", "Jambu"),
            ch("dg49", "Jatamansi"),
            ch("dg50", "Jyotishmati"),
            ch("dg51", "Kanchanara"),
            ch("dg52", "Kantakari"),
            ch("dg53", "Kapikachhu"),
            ch("dg54", "Karkatshrungi"),
            ch("dg55", "Katuki"),
            ch("dg56", "Khadira"),
            ch("dg57", "Kumari"),
            ch("dg58", "Kutaja"),
            ch("dg59", "Latakaranja"),
            ch("dg60", "Lodhra"),
            ch("dg61", "Agnimanth"),
            ch("dg62", "Ahiphena (NK)"),
            ch("dg63", "Ajamoda (DK)"),
            ch("dg64", "Apamarga (DK)"),
            ch("dg65", "Asthishrunkhala"),
            ch("dg66", "Bakuchi"),
            ch("dg67", "Bruhati"),
            ch("dg68", "Chakramarda"),
            ch("dg69", "Dhanyaka"),
            ch("dg70", "Ela"),
            ch("dg71", "Gambhari"),
            ch("dg72", "Japa"),
            ch("dg73", "Jatiphala"),
            ch("dg74", "Jeeraka (DK)"),
            ch("dg75", "Kalamegha"),
            ch("dg76", "Kampillaka"),
            ch("dg77", "Kulatha (NK)"),
            ch("dg78", "Kumkum"),
            ch("dg79", "Lajjalu"),
            ch("dg80", "Lavanga"),
            ch("dg81", "Madanphala"),
            ch("dg82", "Mandukaparni"),
            ch("dg83", "Manjishta"),
            ch("dg84", "Maricha"),
            ch("dg85", "Meshashrungi"),
            ch("dg86", "Methika"),
            ch("dg87", "Musta"),
            ch("dg88", "Nagkeshar"),
            ch("dg89", "Nimba"),
            ch("dg90", "Nirgundi"),
            ch("dg91", "Palasha"),
            ch("dg92", "Pashanabheda"),
            ch("dg93", "Patha"),
            ch("dg94", "Pippali"),
            ch("dg95", "Punarnava"),
            ch("dg96", "Rasna"),
            ch("dg97", "Rasona"),
            ch("dg98", "Sarapagandha"),
            ch("dg99", "Sairayak"),
            ch("dg100", "Sariva"),
            ch("dg101", "Shallaki"),
            ch("dg102", "Shalmali(Mocharasa)"),
            ch("dg103", "Shankhapushpi"),
            ch("dg104", "Shatavari"),
            ch("dg105", "Shigru"),
            ch("dg106", "Shunthi"),
            ch("dg107", "Talisapatra (NK)"),
            ch("dg108", "Trivrut"),
            ch("dg109", "Tulasi"),
            ch("dg110", "Twak"),
            ch("dg111", "Usheera"),
            ch("dg112", "Vacha"),
            ch("dg113", "Varuna"),
            ch("dg114", "Vasa"),
            ch("dg115", "Vatsanabha"),
            ch("dg116", "Vibhitaki"),
            ch("dg117", "Vidanga"),
            ch("dg118", "Yashtimadhu"),
        ],
    );

    let rasashastra = subject(
        "Rasashastra",
        "fuchsia",
        vec![
            ch("r1", "Parada (Mercury) Processing"),
            ch("r2", "Yantras (Instruments)"),
            ch("r3", "Musa Vijnana (Crucibles)"),
            ch("r4", "Bhasma Pariksha"),
            ch("r5", "Ratna & Uparanta"),
        ],
    );

    let swasthavritta = subject(
        "Swasthavritta",
        "blue",
        vec![
            ch("s1", "Dinacharya: Brahma Muhurta"),
            ch("s2", "Ritucharya: Visarga Kala"),
            ch("s3", "Adharaniya Vega"),
            ch("s4", "Nidra (Sleep) Physiology"),
        ],
    );

    let mut roganidana = subject(
        "Roganidana",
        "orange",
        vec![
            ch("ro1", "Nidan Panchak Overview"),
            ch("ro2", "Jwara Nidana (Fever)"),
            ch("ro3", "Pandu Roga (Anemia)"),
            ch("ro4", "Prameha (Diabetes)"),
        ],
    );
    // The stock seed ships with this one already underway.
    roganidana.chapters[0].is_in_progress = true;

    let samhita = subject(
        "Samhita",
        "cyan",
        vec![
            ch("sa1", "Charaka Sutra Ch 1: Dirghanjivitiya"),
            ch("sa2", "Sushruta Sutra Ch 1: Vedotpatti"),
            ch("sa3", "Ashtanga Hridaya Sutra Ch 1"),
            ch("sa4", "Tantrayukti"),
        ],
    );

    let agadatantra = subject(
        "Agadatantra",
        "rose",
        vec![
            ch("ag1", "Classification of Visha"),
            ch("ag2", "Visha Vega (Impulses)"),
            ch("ag3", "Sarpa Visha (Snake Bite)"),
            ch("ag4", "Dushi Visha (Latent Poison)"),
        ],
    );

    SyllabusState::new(vec![
        dravyaguna,
        rasashastra,
        swasthavritta,
        roganidana,
        samhita,
        agadatantra,
    ])
}
