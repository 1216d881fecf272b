//! Hungarian (Munkres) assignment solver.
//!
//! Tasks are matched to synthetic, interchangeable slots so that the total
//! assigned cost is minimal. The algorithm runs as an explicit step machine:
//! every transition consumes a [`Munkres`] bundle and hands back the next
//! [`Step`] together with the updated bundle, so individual steps can be driven
//! and inspected on their own.

use std::ops::Index;

use tracing::{debug, trace};

use crate::cost::{validate_hours, CostModel};
use crate::error::{Result, ScheduleError};
use crate::task::Task;
use crate::user::User;

/// Dense row-major cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Build from nested rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(ScheduleError::RaggedMatrix {
                    row: i,
                    expected: n_cols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        self.data[r * self.cols + c] = value;
    }

    fn get_mut(&mut self, r: usize, c: usize) -> &mut f64 {
        &mut self.data[r * self.cols + c]
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.data[r * self.cols + c]
    }
}

/// Total cost of an assignment (`assignment[row] = col`) against `matrix`.
pub fn assignment_cost(matrix: &CostMatrix, assignment: &[usize]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .map(|(r, &c)| matrix[(r, c)])
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    None,
    Star,
    Prime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    RowReduce,
    ColReduce,
    StarZeros,
    CoverColumns,
    FindUncoveredOrAugment,
    AdjustMatrix,
    Done,
}

/// Working state of one Munkres run: the reduced matrix, zero marks and covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Munkres {
    pub matrix: CostMatrix,
    pub marks: Vec<Mark>,
    pub row_cover: Vec<bool>,
    pub col_cover: Vec<bool>,
}

impl Munkres {
    /// Start a run over a copy of `matrix`. The matrix must be square and finite.
    pub fn new(matrix: &CostMatrix) -> Result<Self> {
        if !matrix.is_square() {
            return Err(ScheduleError::NonSquareMatrix {
                rows: matrix.rows(),
                cols: matrix.cols(),
            });
        }
        let n = matrix.rows();
        if let Some(pos) = matrix.data.iter().position(|v| !v.is_finite()) {
            return Err(ScheduleError::NonFiniteCost {
                row: pos / n,
                col: pos % n,
            });
        }
        Ok(Self {
            matrix: matrix.clone(),
            marks: vec![Mark::None; n * n],
            row_cover: vec![false; n],
            col_cover: vec![false; n],
        })
    }

    pub fn size(&self) -> usize {
        self.row_cover.len()
    }

    pub fn mark(&self, r: usize, c: usize) -> Mark {
        self.marks[r * self.size() + c]
    }

    /// Apply one step and return the step to run next.
    pub fn transition(self, step: Step) -> (Step, Munkres) {
        trace!(?step, "munkres step");
        match step {
            Step::RowReduce => (Step::ColReduce, self.row_reduce()),
            Step::ColReduce => (Step::StarZeros, self.col_reduce()),
            Step::StarZeros => (Step::CoverColumns, self.star_zeros()),
            Step::CoverColumns => self.cover_columns(),
            Step::FindUncoveredOrAugment => self.find_uncovered_or_augment(),
            Step::AdjustMatrix => (Step::FindUncoveredOrAugment, self.adjust_matrix()),
            Step::Done => (Step::Done, self),
        }
    }

    /// Drive the machine from `RowReduce` until `Done`.
    pub fn run(self) -> Munkres {
        let mut step = Step::RowReduce;
        let mut state = self;
        while step != Step::Done {
            let (next, s) = state.transition(step);
            step = next;
            state = s;
        }
        state
    }

    /// Read the assignment off the starred zeros.
    pub fn assignment(&self) -> Vec<usize> {
        let n = self.size();
        (0..n)
            .map(|r| self.star_in_row(r).unwrap_or(n))
            .collect()
    }

    fn set_mark(&mut self, r: usize, c: usize, mark: Mark) {
        let n = self.size();
        self.marks[r * n + c] = mark;
    }

    fn row_reduce(mut self) -> Self {
        let n = self.size();
        for r in 0..n {
            let min = self.matrix.row(r).iter().copied().fold(f64::INFINITY, f64::min);
            for c in 0..n {
                *self.matrix.get_mut(r, c) -= min;
            }
        }
        self
    }

    fn col_reduce(mut self) -> Self {
        let n = self.size();
        for c in 0..n {
            let min = (0..n).map(|r| self.matrix[(r, c)]).fold(f64::INFINITY, f64::min);
            for r in 0..n {
                *self.matrix.get_mut(r, c) -= min;
            }
        }
        self
    }

    fn star_zeros(mut self) -> Self {
        let n = self.size();
        let mut row_used = vec![false; n];
        let mut col_used = vec![false; n];
        for r in 0..n {
            for c in 0..n {
                if self.matrix[(r, c)] == 0.0 && !row_used[r] && !col_used[c] {
                    self.set_mark(r, c, Mark::Star);
                    row_used[r] = true;
                    col_used[c] = true;
                }
            }
        }
        self
    }

    fn cover_columns(mut self) -> (Step, Self) {
        let n = self.size();
        for c in 0..n {
            if self.star_in_col(c).is_some() {
                self.col_cover[c] = true;
            }
        }
        let covered = self.col_cover.iter().filter(|&&c| c).count();
        if covered >= n {
            (Step::Done, self)
        } else {
            (Step::FindUncoveredOrAugment, self)
        }
    }

    fn find_uncovered_or_augment(mut self) -> (Step, Self) {
        loop {
            let Some((r, c)) = self.find_uncovered_zero() else {
                return (Step::AdjustMatrix, self);
            };
            self.set_mark(r, c, Mark::Prime);
            match self.star_in_row(r) {
                Some(star_col) => {
                    self.row_cover[r] = true;
                    self.col_cover[star_col] = false;
                }
                None => {
                    self.augment_from(r, c);
                    self.clear_covers();
                    self.clear_primes();
                    return (Step::CoverColumns, self);
                }
            }
        }
    }

    fn adjust_matrix(mut self) -> Self {
        let n = self.size();
        let mut min = f64::INFINITY;
        for r in (0..n).filter(|&r| !self.row_cover[r]) {
            for c in (0..n).filter(|&c| !self.col_cover[c]) {
                min = min.min(self.matrix[(r, c)]);
            }
        }
        if !min.is_finite() {
            return self;
        }
        // Equivalent to adding `min` to covered rows and subtracting it from
        // uncovered columns, without touching cells where the two cancel.
        for r in 0..n {
            for c in 0..n {
                match (self.row_cover[r], self.col_cover[c]) {
                    (true, true) => *self.matrix.get_mut(r, c) += min,
                    (false, false) => *self.matrix.get_mut(r, c) -= min,
                    _ => {}
                }
            }
        }
        self
    }

    /// Flip stars and primes along the alternating path that starts at the
    /// primed zero `(row, col)`.
    fn augment_from(&mut self, row: usize, col: usize) {
        let mut path = vec![(row, col)];
        let mut c = col;
        while let Some(star_row) = self.star_in_col(c) {
            path.push((star_row, c));
            // A star on the path always shares its row with a prime.
            let Some(prime_col) = self.prime_in_row(star_row) else {
                break;
            };
            path.push((star_row, prime_col));
            c = prime_col;
        }
        for (r, c) in path {
            let flipped = match self.mark(r, c) {
                Mark::Star => Mark::None,
                Mark::Prime => Mark::Star,
                Mark::None => Mark::None,
            };
            self.set_mark(r, c, flipped);
        }
    }

    fn clear_covers(&mut self) {
        self.row_cover.iter_mut().for_each(|c| *c = false);
        self.col_cover.iter_mut().for_each(|c| *c = false);
    }

    fn clear_primes(&mut self) {
        for m in self.marks.iter_mut().filter(|m| **m == Mark::Prime) {
            *m = Mark::None;
        }
    }

    fn find_uncovered_zero(&self) -> Option<(usize, usize)> {
        let n = self.size();
        (0..n).filter(|&r| !self.row_cover[r]).find_map(|r| {
            (0..n)
                .find(|&c| !self.col_cover[c] && self.matrix[(r, c)] == 0.0)
                .map(|c| (r, c))
        })
    }

    fn star_in_row(&self, r: usize) -> Option<usize> {
        (0..self.size()).find(|&c| self.mark(r, c) == Mark::Star)
    }

    fn star_in_col(&self, c: usize) -> Option<usize> {
        (0..self.size()).find(|&r| self.mark(r, c) == Mark::Star)
    }

    fn prime_in_row(&self, r: usize) -> Option<usize> {
        (0..self.size()).find(|&c| self.mark(r, c) == Mark::Prime)
    }
}

/// Assignment-problem solver over tasks and interchangeable slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver {
    cost_model: CostModel,
}

impl HungarianSolver {
    pub fn new(cost_model: CostModel) -> Self {
        Self { cost_model }
    }

    /// n x n matrix where every cell of row `i` is the effective cost of task `i`.
    pub fn build_cost_matrix(&self, tasks: &[Task], user: &User) -> Result<CostMatrix> {
        validate_hours(tasks)?;
        let n = tasks.len();
        let mut matrix = CostMatrix::filled(n, n, 0.0);
        for (i, task) in tasks.iter().enumerate() {
            let cost = self.cost_model.effective_cost(task, user);
            for j in 0..n {
                matrix.set(i, j, cost);
            }
        }
        Ok(matrix)
    }

    /// Minimum-cost assignment; `result[row]` is the column given to `row`.
    pub fn solve(&self, matrix: &CostMatrix) -> Result<Vec<usize>> {
        let done = Munkres::new(matrix)?.run();
        let assignment = done.assignment();
        debug!(
            n = assignment.len(),
            total = assignment_cost(matrix, &assignment),
            "hungarian assignment solved"
        );
        Ok(assignment)
    }

    pub fn solve_with_hobby_bonus(&self, tasks: &[Task], user: &User) -> Result<Vec<usize>> {
        let matrix = self.build_cost_matrix(tasks, user)?;
        self.solve(&matrix)
    }
}
