//! Static exercise-plan catalog. Plan completion state lives in the
//! `completedExercises` journal; the catalog itself never changes at runtime.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl PlanLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Eq, PartialEq)]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub duration: &'static str,
    pub description: &'static str,
    pub difficulty: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Eq, PartialEq)]
pub struct ExercisePlan {
    pub id: &'static str,
    pub name: &'static str,
    pub level: PlanLevel,
    pub description: &'static str,
    pub exercises: &'static [Exercise],
}

pub static PLANS: &[ExercisePlan] = &[
    ExercisePlan {
        id: "beginner",
        name: "Gentle Back Relief",
        level: PlanLevel::Beginner,
        description: "Simple exercises for beginners to relieve back tension and improve flexibility",
        exercises: &[
            Exercise {
                id: "b1",
                name: "Cat-Cow Stretch",
                duration: "1 minute",
                description: "Get on all fours and alternate between arching and rounding your back",
                difficulty: 1,
            },
            Exercise {
                id: "b2",
                name: "Knee-to-Chest Stretch",
                duration: "30 seconds each side",
                description: "Lie on your back and gently pull one knee toward your chest",
                difficulty: 1,
            },
            Exercise {
                id: "b3",
                name: "Pelvic Tilts",
                duration: "1 minute",
                description: "Lie on your back with knees bent and tilt your pelvis up and down",
                difficulty: 2,
            },
            Exercise {
                id: "b4",
                name: "Gentle Spinal Twist",
                duration: "30 seconds each side",
                description: "Lie on your back, knees bent, and gently rotate your knees to one side",
                difficulty: 2,
            },
        ],
    },
    ExercisePlan {
        id: "intermediate",
        name: "Core Strengthening",
        level: PlanLevel::Intermediate,
        description: "Moderate exercises to build core strength and support your back",
        exercises: &[
            Exercise {
                id: "i1",
                name: "Bird Dog",
                duration: "10 reps each side",
                description: "On all fours, extend opposite arm and leg while maintaining balance",
                difficulty: 3,
            },
            Exercise {
                id: "i2",
                name: "Glute Bridges",
                duration: "12 reps",
                description: "Lie on your back, feet flat, and lift your hips toward the ceiling",
                difficulty: 2,
            },
            Exercise {
                id: "i3",
                name: "Side Plank",
                duration: "20 seconds each side",
                description: "Support your body weight on forearm and side of foot",
                difficulty: 4,
            },
            Exercise {
                id: "i4",
                name: "Superman",
                duration: "10 reps",
                description: "Lie on your stomach and lift arms and legs off the ground",
                difficulty: 3,
            },
            Exercise {
                id: "i5",
                name: "Modified Plank",
                duration: "30 seconds",
                description: "Hold a forearm plank position, keeping your core engaged",
                difficulty: 3,
            },
        ],
    },
    ExercisePlan {
        id: "advanced",
        name: "Back & Core Power",
        level: PlanLevel::Advanced,
        description: "Challenging exercises for those with good baseline strength and no acute pain",
        exercises: &[
            Exercise {
                id: "a1",
                name: "Dead Bug",
                duration: "12 reps each side",
                description: "Lie on back, extend opposite arm and leg while keeping core engaged",
                difficulty: 4,
            },
            Exercise {
                id: "a2",
                name: "Plank with Shoulder Taps",
                duration: "10 taps each side",
                description: "In plank position, tap opposite shoulder while maintaining stability",
                difficulty: 4,
            },
            Exercise {
                id: "a3",
                name: "Reverse Hyperextension",
                duration: "15 reps",
                description: "Lie on stomach on bench/edge of bed, lift legs with control",
                difficulty: 5,
            },
            Exercise {
                id: "a4",
                name: "Side Plank with Rotation",
                duration: "8 reps each side",
                description: "From side plank, rotate arm under and back to extended position",
                difficulty: 5,
            },
        ],
    },
];

#[must_use]
pub fn plan_by_id(id: &str) -> Option<&'static ExercisePlan> {
    PLANS.iter().find(|plan| plan.id == id)
}

#[must_use]
pub fn exercise_by_id(id: &str) -> Option<&'static Exercise> {
    PLANS
        .iter()
        .flat_map(|plan| plan.exercises.iter())
        .find(|exercise| exercise.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_carries_three_plans_and_thirteen_exercises() {
        assert_eq!(PLANS.len(), 3);
        let total: usize = PLANS.iter().map(|plan| plan.exercises.len()).sum();
        assert_eq!(total, 13);
    }

    #[test]
    fn exercise_ids_are_unique_across_plans() {
        let mut ids: Vec<&str> = PLANS
            .iter()
            .flat_map(|plan| plan.exercises.iter())
            .map(|exercise| exercise.id)
            .collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn lookups_find_plans_and_exercises() {
        assert_eq!(plan_by_id("intermediate").map(|plan| plan.name), Some("Core Strengthening"));
        assert_eq!(exercise_by_id("a3").map(|exercise| exercise.name), Some("Reverse Hyperextension"));
        assert!(plan_by_id("expert").is_none());
        assert!(exercise_by_id("z9").is_none());
    }

    #[test]
    fn difficulties_stay_on_the_five_point_scale() {
        for plan in PLANS {
            for exercise in plan.exercises {
                assert!((1..=5).contains(&exercise.difficulty), "{}", exercise.id);
            }
        }
    }
}
