//! crates/mood_journal_core/src/content.rs
//!
//! Static guidance copy: a quote, tip, colour and emoji per emotion, advice per
//! cycle day, and a rotating "fact of the day".

use crate::domain::{CycleDay, Emotion};
use chrono::{Datelike, NaiveDate};

/// Guidance shown alongside an entry's dominant emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionContent {
    pub quote: &'static str,
    pub tip: &'static str,
    pub color: &'static str,
    pub emoji: &'static str,
    pub cycle_advice: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyFact {
    pub fact: &'static str,
    pub icon: &'static str,
    pub tip: &'static str,
}

struct EmotionCopy {
    quote: &'static str,
    tip: &'static str,
    color: &'static str,
    emoji: &'static str,
}

pub const GENERIC_CYCLE_ADVICE: &str = "Remember to listen to your body and honor your needs.";

fn emotion_copy(emotion: Emotion) -> EmotionCopy {
    match emotion {
        Emotion::Joy => EmotionCopy {
            quote: "Your joy is your sorrow unmasked. - Kahlil Gibran",
            tip: "Celebrate this feeling! Consider journaling about what brought you joy today.",
            color: "#FFD700",
            emoji: "😊",
        },
        Emotion::Sadness => EmotionCopy {
            quote: "It's okay to not be okay. Be gentle with yourself today.",
            tip: "Try gentle movement like stretching or a short walk. Reach out to someone you trust.",
            color: "#4169E1",
            emoji: "💙",
        },
        Emotion::Anger => EmotionCopy {
            quote: "Your feelings are valid. Take time to understand what you need.",
            tip: "Try deep breathing exercises. Count to 10 before reacting. Physical activity can help release tension.",
            color: "#FF6B35",
            emoji: "🔥",
        },
        Emotion::Fear => EmotionCopy {
            quote: "Courage is not the absence of fear, but the triumph over it.",
            tip: "Ground yourself with the 5-4-3-2-1 technique. Name 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell, 1 you can taste.",
            color: "#7B68EE",
            emoji: "💜",
        },
        Emotion::Surprise => EmotionCopy {
            quote: "Life is full of surprises. Embrace the unexpected with curiosity.",
            tip: "Take a moment to reflect on what surprised you and what you can learn from it.",
            color: "#FF8C00",
            emoji: "✨",
        },
        Emotion::Disgust => EmotionCopy {
            quote: "Listen to your boundaries. They're protecting you.",
            tip: "It's okay to step away from what doesn't feel right. Honor your feelings and set healthy boundaries.",
            color: "#32CD32",
            emoji: "🌿",
        },
        Emotion::Neutral => EmotionCopy {
            quote: "Sometimes the most productive thing you can do is rest.",
            tip: "Neutral days are perfectly normal. Use this calm to check in with yourself.",
            color: "#9E9E9E",
            emoji: "🌸",
        },
    }
}

fn cycle_advice(cycle_day: i64) -> &'static str {
    match CycleDay::new(cycle_day).map(|d| d.get()) {
        Some(1) => "Day 1 can be challenging. Rest is productive. Stay hydrated and be extra kind to yourself.",
        Some(2) => "Your body is working hard. Gentle movement and warm compresses can help with discomfort.",
        Some(3) => "You're past the hardest part. Notice if your energy is starting to shift.",
        Some(4) => "Energy may be returning. Listen to your body's signals.",
        Some(5) => "Notice how you're feeling. Many people start feeling lighter around now.",
        Some(6) => "You might notice increased energy. It's a great time for activities you enjoy.",
        Some(7) => "The final stretch. Reflect on your cycle and what you've learned about yourself.",
        _ => GENERIC_CYCLE_ADVICE,
    }
}

/// Looks up guidance for an emotion label and cycle day.
///
/// Labels are matched case-insensitively and unknown labels fall back to `neutral`.
/// Cycle days outside 1..=7 get generic advice.
pub fn content_for(emotion_label: &str, cycle_day: i64) -> EmotionContent {
    let emotion = Emotion::parse(emotion_label).unwrap_or(Emotion::Neutral);
    content_for_emotion(emotion, cycle_day)
}

pub fn content_for_emotion(emotion: Emotion, cycle_day: i64) -> EmotionContent {
    let copy = emotion_copy(emotion);
    EmotionContent {
        quote: copy.quote,
        tip: copy.tip,
        color: copy.color,
        emoji: copy.emoji,
        cycle_advice: cycle_advice(cycle_day),
    }
}

//=========================================================================================
// Fact of the Day
//=========================================================================================

pub static FACTS: [DailyFact; 31] = [
    DailyFact {
        fact: "The average menstrual cycle lasts 28 days, but anywhere from 21 to 35 days is considered normal.",
        icon: "📅",
        tip: "Track your cycle to understand your unique pattern!",
    },
    DailyFact {
        fact: "Period blood isn't actually just blood - it's a mix of blood, tissue from the uterine lining, and vaginal secretions.",
        icon: "🔬",
        tip: "Changes in color and consistency are usually normal.",
    },
    DailyFact {
        fact: "You lose about 2-3 tablespoons of blood during your entire period, though it can feel like much more!",
        icon: "💧",
        tip: "Heavy bleeding (more than 80ml) should be discussed with a doctor.",
    },
    DailyFact {
        fact: "Period cramps happen because your uterus contracts to shed its lining. Prostaglandins are the chemicals responsible.",
        icon: "💪",
        tip: "Heat, exercise, and anti-inflammatory medications can help!",
    },
    DailyFact {
        fact: "Your metabolism can increase slightly during your period, which is why you might feel hungrier!",
        icon: "🍽️",
        tip: "Listen to your body and nourish it with what it needs.",
    },
    DailyFact {
        fact: "PMS symptoms can start up to 2 weeks before your period and affect up to 90% of menstruating people.",
        icon: "🧠",
        tip: "Tracking your symptoms can help you prepare and cope better.",
    },
    DailyFact {
        fact: "Exercise during your period can actually help reduce cramps and improve your mood through endorphin release.",
        icon: "🏃‍♀️",
        tip: "Even gentle movement like walking or stretching counts!",
    },
    DailyFact {
        fact: "The first day of your period is considered Day 1 of your menstrual cycle.",
        icon: "🌟",
        tip: "This is when hormones are at their lowest before starting to rise again.",
    },
    DailyFact {
        fact: "Chocolate cravings during your period are real! Your body needs more magnesium, and chocolate is rich in it.",
        icon: "🍫",
        tip: "Dark chocolate is a great source of magnesium and iron.",
    },
    DailyFact {
        fact: "Your sense of smell can be heightened during certain phases of your menstrual cycle.",
        icon: "👃",
        tip: "This is linked to hormonal changes throughout your cycle.",
    },
    DailyFact {
        fact: "Period pain that interferes with daily activities could be a sign of endometriosis or other conditions.",
        icon: "⚠️",
        tip: "Don't ignore severe pain - consult a healthcare provider.",
    },
    DailyFact {
        fact: "Your period can affect your sleep quality due to hormonal fluctuations, especially progesterone levels.",
        icon: "😴",
        tip: "Prioritize rest and maintain good sleep hygiene during your cycle.",
    },
    DailyFact {
        fact: "The menstrual cycle is divided into 4 phases: menstruation, follicular, ovulation, and luteal.",
        icon: "🔄",
        tip: "Each phase has unique hormonal patterns and potential mood effects.",
    },
    DailyFact {
        fact: "Stress can affect your menstrual cycle, potentially causing it to be late, early, or skipped entirely.",
        icon: "🧘‍♀️",
        tip: "Stress management techniques can help regulate your cycle.",
    },
    DailyFact {
        fact: "Period products have evolved significantly - from pads and tampons to menstrual cups and period underwear!",
        icon: "🌸",
        tip: "Find what works best for your body and lifestyle.",
    },
    DailyFact {
        fact: "Your energy levels naturally fluctuate throughout your cycle - it's not just in your head!",
        icon: "⚡",
        tip: "Plan important tasks during your high-energy phases when possible.",
    },
    DailyFact {
        fact: "The color of your period blood can tell you things about your health - bright red is fresh, dark is older blood.",
        icon: "🎨",
        tip: "Very pale or gray discharge should be checked by a doctor.",
    },
    DailyFact {
        fact: "You can still get pregnant during your period, though it's less likely. Ovulation timing varies!",
        icon: "💡",
        tip: "Use contraception consistently if pregnancy prevention is important.",
    },
    DailyFact {
        fact: "Orgasms can help relieve menstrual cramps by releasing endorphins and relaxing the uterine muscles.",
        icon: "💕",
        tip: "Self-care comes in many forms - do what feels right for you!",
    },
    DailyFact {
        fact: "The average person will menstruate for about 7 years of their lifetime!",
        icon: "⏰",
        tip: "That's why understanding and tracking your cycle is so valuable.",
    },
    DailyFact {
        fact: "Hydration is extra important during your period - it can help reduce bloating and headaches.",
        icon: "💦",
        tip: "Aim for at least 8 glasses of water throughout the day.",
    },
    DailyFact {
        fact: "Iron levels can drop during menstruation due to blood loss, which may cause fatigue.",
        icon: "🥬",
        tip: "Eat iron-rich foods like leafy greens, beans, and lean meats.",
    },
    DailyFact {
        fact: "Period apps and trackers can help predict your next period and identify patterns in your cycle.",
        icon: "📱",
        tip: "You're already doing this - great job taking charge of your health!",
    },
    DailyFact {
        fact: "Hormonal birth control works by preventing ovulation, which is why some people don't get periods on it.",
        icon: "💊",
        tip: "Talk to your doctor about what's right for your body.",
    },
    DailyFact {
        fact: "Mood changes during your cycle are linked to fluctuating levels of estrogen and progesterone.",
        icon: "🎭",
        tip: "Tracking your moods can help you understand and prepare for these changes.",
    },
    DailyFact {
        fact: "Ancient cultures celebrated menstruation as a sign of fertility and feminine power.",
        icon: "🏛️",
        tip: "Your body is capable of amazing things!",
    },
    DailyFact {
        fact: "The word 'menstruation' comes from Latin 'mensis' meaning 'month' - linked to lunar cycles.",
        icon: "🌙",
        tip: "Many cultures have connected menstrual cycles to moon phases.",
    },
    DailyFact {
        fact: "Everyone's period is different - what's normal for you might not be normal for someone else.",
        icon: "✨",
        tip: "Trust your body and speak up if something feels wrong.",
    },
    DailyFact {
        fact: "Fiber-rich foods can help with period symptoms by regulating hormones and reducing bloating.",
        icon: "🥦",
        tip: "Include whole grains, fruits, and vegetables in your diet.",
    },
    DailyFact {
        fact: "Your pain tolerance can actually decrease during menstruation due to hormonal changes.",
        icon: "🌡️",
        tip: "Be extra gentle with yourself during this time.",
    },
    DailyFact {
        fact: "Regular exercise can help regulate your menstrual cycle and reduce PMS symptoms.",
        icon: "🤸‍♀️",
        tip: "Find activities you enjoy to make it sustainable long-term.",
    },
];

/// Picks the fact for a calendar date: `FACTS[day_of_year % FACTS.len()]`.
pub fn fact_of_day(date: NaiveDate) -> &'static DailyFact {
    let day_of_year = date.ordinal() as usize;
    &FACTS[day_of_year % FACTS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_matching_ignores_case() {
        assert_eq!(content_for("JOY", 3), content_for("joy", 3));
        assert_eq!(content_for("Joy", 3).emoji, "😊");
    }

    #[test]
    fn unknown_label_falls_back_to_neutral() {
        let fallback = content_for("unknown_label", 3);
        let neutral = content_for("neutral", 3);
        assert_eq!(fallback.quote, neutral.quote);
        assert_eq!(fallback.tip, neutral.tip);
        assert_eq!(fallback.color, neutral.color);
    }

    #[test]
    fn out_of_range_cycle_day_gets_generic_advice() {
        assert_eq!(content_for("joy", 0).cycle_advice, GENERIC_CYCLE_ADVICE);
        assert_eq!(content_for("joy", 8).cycle_advice, GENERIC_CYCLE_ADVICE);
        assert_ne!(content_for("joy", 7).cycle_advice, GENERIC_CYCLE_ADVICE);
    }

    #[test]
    fn every_emotion_has_distinct_copy() {
        let colors: std::collections::BTreeSet<_> = Emotion::ALL
            .iter()
            .map(|e| content_for_emotion(*e, 1).color)
            .collect();
        assert_eq!(colors.len(), Emotion::ALL.len());
    }

    #[test]
    fn fact_of_day_is_stable_for_a_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(fact_of_day(date), fact_of_day(date));
    }

    #[test]
    fn fact_of_day_cycles_with_list_length() {
        let first = NaiveDate::from_ymd_opt(2023, 1, 10).unwrap();
        let later = first + chrono::Duration::days(FACTS.len() as i64);
        assert_eq!(first.year(), later.year());
        assert_eq!(fact_of_day(first), fact_of_day(later));
    }

    #[test]
    fn fact_of_day_uses_ordinal_index() {
        // January 1st is ordinal 1.
        let new_year = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(fact_of_day(new_year), &FACTS[1]);
    }
}
