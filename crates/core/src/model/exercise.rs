//! Toy code exercises: a submission passes when it matches the expected
//! code after trimming surrounding whitespace.

use crate::model::catalog::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub title: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub code_example: String,
    pub correct_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub fn feedback(self) -> &'static str {
        match self {
            Verdict::Correct => "Correct! Well done.",
            Verdict::Incorrect => "Try again! Check your code.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Advanced,
    Finished,
}

#[must_use]
pub fn check_submission(submitted: &str, expected: &str) -> Verdict {
    if submitted.trim() == expected.trim() {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

/// Walks a fixed list of exercises in order.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    exercises: Vec<Exercise>,
    current: usize,
}

impl ExerciseSession {
    /// Returns `None` when there is nothing to practise.
    #[must_use]
    pub fn new(exercises: Vec<Exercise>) -> Option<Self> {
        if exercises.is_empty() {
            return None;
        }
        Some(Self {
            exercises,
            current: 0,
        })
    }

    #[must_use]
    pub fn current(&self) -> &Exercise {
        &self.exercises[self.current]
    }

    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.exercises.len())
    }

    #[must_use]
    pub fn submit(&self, code: &str) -> Verdict {
        check_submission(code, &self.current().correct_code)
    }

    /// Moves to the next exercise; stays on the last one once finished.
    pub fn advance(&mut self) -> Advance {
        if self.current + 1 < self.exercises.len() {
            self.current += 1;
            Advance::Advanced
        } else {
            Advance::Finished
        }
    }
}

#[must_use]
pub fn bundled_exercises() -> Vec<Exercise> {
    vec![
        Exercise {
            title: "Console Log".into(),
            difficulty: Difficulty::Beginner,
            description: "Log 'Hello, React!' to the console.".into(),
            code_example: "console.log('Hello, React!');".into(),
            correct_code: "console.log('Hello, React!');".into(),
        },
        Exercise {
            title: "State Management with useState".into(),
            difficulty: Difficulty::Intermediate,
            description: "Create a counter that increments by 1 each time a button is clicked."
                .into(),
            code_example: "const [count, setCount] = useState(0);\nreturn <Button title=\"Increment\" onPress={() => setCount(count + 1)} />;".into(),
            correct_code: "const [count, setCount] = useState(0);".into(),
        },
        Exercise {
            title: "Handling Events".into(),
            difficulty: Difficulty::Advanced,
            description: "Create a form with an input field and a submit button.".into(),
            code_example: "const [inputValue, setInputValue] = useState('');\nreturn <TextInput value={inputValue} onChangeText={setInputValue} />;".into(),
            correct_code: "const [inputValue, setInputValue] = useState('');".into(),
        },
    ]
}
