pub fn puzzle_dates_key() -> &'static str {
    "puzzle:dates"
}

pub fn puzzle_key(puzzle_date: &str) -> String {
    format!("puzzle:{}", puzzle_date)
}

pub fn attempts_key(puzzle_date: &str, clue_id: &str) -> String {
    format!("quiz:{}:{}", puzzle_date, clue_id)
}
