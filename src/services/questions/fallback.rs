//! 内置题库：LLM 不可用或输出不合格时的备用题目
//!
//! 按年级段（K-2 / 3 / 4 / 5）与科目分组，每道题都能通过 `validate_question`。

use crate::models::questions::entities::{GeneratedQuestion, Subject};
use crate::models::questions::requests::QuestionSpec;

struct CannedQuestion {
    teks: &'static str,
    category: &'static str,
    text: &'static str,
    choices: [&'static str; 4],
    correct: &'static str,
    explanation: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    KToTwo,
    Three,
    Four,
    Five,
}

impl GradeBand {
    pub fn for_grade(grade_level: i32) -> Self {
        match grade_level {
            i32::MIN..=2 => GradeBand::KToTwo,
            3 => GradeBand::Three,
            4 => GradeBand::Four,
            _ => GradeBand::Five,
        }
    }
}

const MATH_K2: &[CannedQuestion] = &[
    CannedQuestion {
        teks: "1.3B",
        category: "addition",
        text: "Maria has 6 red crayons and 3 blue crayons. How many crayons does she have in all?",
        choices: ["8", "9", "10", "3"],
        correct: "B",
        explanation: "Put the crayons together: 6 + 3 = 9.",
    },
    CannedQuestion {
        teks: "2.4B",
        category: "subtraction",
        text: "There are 15 birds on a fence. 7 birds fly away. How many birds are still on the fence?",
        choices: ["8", "7", "22", "9"],
        correct: "A",
        explanation: "Take away the birds that flew away: 15 - 7 = 8.",
    },
    CannedQuestion {
        teks: "2.2D",
        category: "place value",
        text: "Which number is greater than 47?",
        choices: ["39", "45", "52", "47"],
        correct: "C",
        explanation: "52 has 5 tens and 47 has only 4 tens, so 52 is the greater number.",
    },
];

const MATH_3: &[CannedQuestion] = &[
    CannedQuestion {
        teks: "3.4K",
        category: "multiplication",
        text: "A classroom has 4 tables. Each table has 6 students. How many students are in the classroom?",
        choices: ["10", "24", "20", "28"],
        correct: "B",
        explanation: "Multiply the number of tables by the students at each table: 4 × 6 = 24.",
    },
    CannedQuestion {
        teks: "3.4A",
        category: "addition",
        text: "A school library has 1,245 fiction books and 380 nonfiction books. How many books does the library have in all?",
        choices: ["1,525", "1,625", "1,565", "865"],
        correct: "B",
        explanation: "Add the two kinds of books: 1,245 + 380 = 1,625.",
    },
    CannedQuestion {
        teks: "3.4K",
        category: "division",
        text: "Jake has 18 stickers. He shares them equally among 3 friends. How many stickers does each friend get?",
        choices: ["5", "6", "15", "21"],
        correct: "B",
        explanation: "Share 18 stickers into 3 equal groups: 18 ÷ 3 = 6.",
    },
];

const MATH_4: &[CannedQuestion] = &[
    CannedQuestion {
        teks: "4.4H",
        category: "division",
        text: "A baker makes 96 muffins and packs them into boxes of 8. How many boxes does the baker fill?",
        choices: ["11", "12", "13", "88"],
        correct: "B",
        explanation: "Divide the muffins into groups of 8: 96 ÷ 8 = 12.",
    },
    CannedQuestion {
        teks: "4.4B",
        category: "multiplication",
        text: "A theater has 23 rows with 14 seats in each row. How many seats are in the theater?",
        choices: ["322", "312", "37", "332"],
        correct: "A",
        explanation: "Multiply the rows by the seats in each row: 23 × 14 = 322.",
    },
    CannedQuestion {
        teks: "4.3E",
        category: "fractions",
        text: "Lena ate 2/8 of a pizza. Her brother ate 3/8 of the same pizza. What fraction of the pizza did they eat together?",
        choices: ["5/16", "5/8", "1/8", "6/8"],
        correct: "B",
        explanation: "The pieces are the same size, so add the numerators and keep the denominator: 2/8 + 3/8 = 5/8.",
    },
];

const MATH_5: &[CannedQuestion] = &[
    CannedQuestion {
        teks: "5.3E",
        category: "decimals",
        text: "A notebook costs $2.50. How much do 4 notebooks cost?",
        choices: ["$8.50", "$10.00", "$6.50", "$12.00"],
        correct: "B",
        explanation: "Multiply the price by the number of notebooks: 4 × 2.50 = 10.00, so the cost is $10.00.",
    },
    CannedQuestion {
        teks: "5.3C",
        category: "division",
        text: "A farmer packs 1,512 apples equally into 12 crates. How many apples go in each crate?",
        choices: ["126", "136", "116", "1,500"],
        correct: "A",
        explanation: "Divide the apples among the crates: 1,512 ÷ 12 = 126.",
    },
    CannedQuestion {
        teks: "5.4H",
        category: "volume",
        text: "A rectangular box is 5 centimeters long, 4 centimeters wide, and 3 centimeters tall. What is the volume of the box?",
        choices: ["12 cubic centimeters", "60 cubic centimeters", "47 cubic centimeters", "20 cubic centimeters"],
        correct: "B",
        explanation: "Volume is length times width times height: 5 × 4 × 3 = 60 cubic centimeters.",
    },
];

const READING_K2: &[CannedQuestion] = &[
    CannedQuestion {
        teks: "2.6G",
        category: "main idea",
        text: "Read the story.\n\nTom found a small puppy in the rain. He dried it with a towel and gave it warm milk. The puppy licked his hand and wagged its tail.\n\nWhat is the story mostly about?",
        choices: [
            "A boy who plays in the rain",
            "A boy who helps a puppy",
            "A puppy who buys milk",
            "A towel that gets wet",
        ],
        correct: "B",
        explanation: "Most of the sentences tell how Tom takes care of the puppy, so the story is mostly about a boy helping a puppy.",
    },
    CannedQuestion {
        teks: "1.2B",
        category: "phonics",
        text: "Which word rhymes with cat?",
        choices: ["cup", "hat", "cot", "can"],
        correct: "B",
        explanation: "Hat ends with the same sound as cat.",
    },
    CannedQuestion {
        teks: "2.3B",
        category: "vocabulary",
        text: "Read the sentence.\n\nThe giant elephant was so big it could not fit through the door.\n\nWhat does the word giant mean?",
        choices: ["very small", "very big", "very fast", "very loud"],
        correct: "B",
        explanation: "The sentence says the elephant was so big it could not fit through the door, so giant means very big.",
    },
];

const READING_3: &[CannedQuestion] = &[
    CannedQuestion {
        teks: "3.6G",
        category: "main idea",
        text: "Read the passage.\n\nHoney bees live together in a hive. Some bees collect nectar from flowers. Other bees guard the hive or take care of baby bees. Every bee has a job that helps the whole hive.\n\nWhat is the main idea of the passage?",
        choices: [
            "Bees like flowers.",
            "Every bee in a hive has a job.",
            "Baby bees are small.",
            "Hives are made of wax.",
        ],
        correct: "B",
        explanation: "The passage lists different jobs and ends by saying every bee has a job that helps the hive.",
    },
    CannedQuestion {
        teks: "3.3B",
        category: "context clues",
        text: "Read the sentence.\n\nAfter the long hike, Rosa was so weary that she fell asleep as soon as she sat down.\n\nWhat does the word weary mean?",
        choices: ["excited", "very tired", "hungry", "angry"],
        correct: "B",
        explanation: "Rosa fell asleep right after a long hike, which shows that weary means very tired.",
    },
    CannedQuestion {
        teks: "3.6F",
        category: "inference",
        text: "Read the passage.\n\nLuis grabbed his umbrella and his raincoat before he walked out the door. He looked up at the dark clouds and frowned.\n\nWhat can the reader tell about the weather?",
        choices: [
            "It is sunny and hot.",
            "It is snowing.",
            "It is going to rain.",
            "It is very windy.",
        ],
        correct: "C",
        explanation: "Luis takes an umbrella and a raincoat and sees dark clouds, so it is probably going to rain.",
    },
];

const READING_4: &[CannedQuestion] = &[
    CannedQuestion {
        teks: "4.6G",
        category: "main idea",
        text: "Read the passage.\n\nMonarch butterflies travel thousands of miles each fall. They fly from Canada and the United States to the mountains of Mexico, where the weather stays warm enough for them to survive the winter.\n\nWhat is the passage mostly about?",
        choices: [
            "How monarchs find food",
            "Why monarch butterflies travel to Mexico",
            "The colors of monarch wings",
            "How tall the mountains in Mexico are",
        ],
        correct: "B",
        explanation: "The passage explains where monarchs fly and that they go to Mexico to survive the winter.",
    },
    CannedQuestion {
        teks: "4.3B",
        category: "context clues",
        text: "Read the sentence.\n\nThe soup was so scalding that Mia had to wait ten minutes before she could take a sip.\n\nWhat does the word scalding mean?",
        choices: ["very cold", "very salty", "very hot", "very thick"],
        correct: "C",
        explanation: "Mia had to wait before tasting the soup, which shows it was very hot.",
    },
    CannedQuestion {
        teks: "4.9D",
        category: "text features",
        text: "A science article has a heading that says How Plants Make Food. What will the reader most likely learn in that section?",
        choices: [
            "Where to buy plants",
            "How plants use sunlight, water, and air to make food",
            "Which animals eat plants",
            "How to draw a plant",
        ],
        correct: "B",
        explanation: "A heading tells what a section is about, so this section explains how plants make their own food.",
    },
];

const READING_5: &[CannedQuestion] = &[
    CannedQuestion {
        teks: "5.6G",
        category: "main idea",
        text: "Read the passage.\n\nCoral reefs cover a tiny part of the ocean floor, yet about one quarter of all ocean fish depend on them. Reefs give fish places to hide, find food, and lay eggs.\n\nWhich sentence best states the main idea?",
        choices: [
            "Coral reefs are very colorful.",
            "Coral reefs are important homes for many ocean fish.",
            "Fish lay eggs in the sand.",
            "The ocean floor is mostly empty.",
        ],
        correct: "B",
        explanation: "The passage explains how many fish depend on reefs for shelter, food, and a place to lay eggs.",
    },
    CannedQuestion {
        teks: "5.3B",
        category: "context clues",
        text: "Read the sentence.\n\nThe old bridge was so fragile that the town closed it before it could break under the weight of cars.\n\nWhat does the word fragile mean?",
        choices: ["easily broken", "very long", "newly built", "brightly painted"],
        correct: "A",
        explanation: "The town closed the bridge because it might break, so fragile means easily broken.",
    },
    CannedQuestion {
        teks: "5.10A",
        category: "author's purpose",
        text: "An article lists the steps for planting a vegetable garden, from choosing a sunny spot to watering the seeds each day. What is the author's purpose?",
        choices: [
            "To entertain readers with a funny story",
            "To persuade readers to buy vegetables",
            "To explain how to plant a garden",
            "To describe the author's favorite food",
        ],
        correct: "C",
        explanation: "The article gives step-by-step directions, so the author wants to explain how to plant a garden.",
    },
];

fn bank(band: GradeBand, subject: Subject) -> &'static [CannedQuestion] {
    match (band, subject) {
        (GradeBand::KToTwo, Subject::Math) => MATH_K2,
        (GradeBand::Three, Subject::Math) => MATH_3,
        (GradeBand::Four, Subject::Math) => MATH_4,
        (GradeBand::Five, Subject::Math) => MATH_5,
        (GradeBand::KToTwo, Subject::Reading) => READING_K2,
        (GradeBand::Three, Subject::Reading) => READING_3,
        (GradeBand::Four, Subject::Reading) => READING_4,
        (GradeBand::Five, Subject::Reading) => READING_5,
    }
}

/// 按 seed 轮换选取备用题；请求指定的 TEKS 在库中存在时优先从中选
pub fn fallback_question(spec: &QuestionSpec, seed: usize) -> (GeneratedQuestion, &'static str) {
    let candidates = bank(GradeBand::for_grade(spec.grade_level), spec.subject);
    let requested = spec
        .teks_standard
        .as_deref()
        .map(|t| t.trim().to_uppercase());
    let matching: Vec<&CannedQuestion> = candidates
        .iter()
        .filter(|q| requested.as_deref() == Some(q.teks))
        .collect();
    let pool: Vec<&CannedQuestion> = if matching.is_empty() {
        candidates.iter().collect()
    } else {
        matching
    };

    let canned = pool[seed % pool.len()];
    (to_generated(canned), canned.category)
}

fn to_generated(canned: &CannedQuestion) -> GeneratedQuestion {
    GeneratedQuestion {
        question_text: canned.text.to_string(),
        answer_choices: canned.choices.iter().map(|c| c.to_string()).collect(),
        correct_answer: canned.correct.to_string(),
        explanation: canned.explanation.to_string(),
        teks_standard: canned.teks.to_string(),
        has_image: false,
        image_description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::questions::validate::validate_question;

    const BANDS: [GradeBand; 4] = [
        GradeBand::KToTwo,
        GradeBand::Three,
        GradeBand::Four,
        GradeBand::Five,
    ];

    #[test]
    fn test_every_canned_question_validates() {
        for band in BANDS {
            for subject in [Subject::Math, Subject::Reading] {
                let questions = bank(band, subject);
                assert!(!questions.is_empty());
                for canned in questions {
                    let result = validate_question(&to_generated(canned));
                    assert!(
                        result.is_valid,
                        "{band:?}/{subject} '{}': {:?}",
                        canned.text, result.errors
                    );
                }
            }
        }
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(GradeBand::for_grade(0), GradeBand::KToTwo);
        assert_eq!(GradeBand::for_grade(2), GradeBand::KToTwo);
        assert_eq!(GradeBand::for_grade(3), GradeBand::Three);
        assert_eq!(GradeBand::for_grade(4), GradeBand::Four);
        assert_eq!(GradeBand::for_grade(5), GradeBand::Five);
    }

    #[test]
    fn test_selection_is_deterministic_and_rotates() {
        let spec = QuestionSpec::new(4, Subject::Math);
        let (first, _) = fallback_question(&spec, 0);
        let (again, _) = fallback_question(&spec, 0);
        let (second, _) = fallback_question(&spec, 1);
        let (wrapped, _) = fallback_question(&spec, MATH_4.len());
        assert_eq!(first, again);
        assert_ne!(first, second);
        assert_eq!(first, wrapped);
    }

    #[test]
    fn test_prefers_requested_teks() {
        let mut spec = QuestionSpec::new(3, Subject::Math);
        spec.teks_standard = Some("3.4a".into());
        for seed in 0..5 {
            let (q, category) = fallback_question(&spec, seed);
            assert_eq!(q.teks_standard, "3.4A");
            assert_eq!(category, "addition");
        }
    }
}
