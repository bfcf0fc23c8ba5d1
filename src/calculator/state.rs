//! Operand/operator state shared by the chained calculators.

/// A binary operation waiting for its right operand.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingOperation<Op> {
    /// Operand text entered before the operator was pressed.
    pub left: String,
    /// Operator to apply once the right operand is complete.
    pub operator: Op,
}

/// Per-mode calculator state.
///
/// `current` is the operand being typed. It is empty right after an operator
/// was recorded and `"0"` after construction or a clear.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorState<Op, N = f64> {
    /// Operand text being typed.
    pub current: String,
    /// Operation recorded by the last operator press.
    pub pending: Option<PendingOperation<Op>>,
    /// Value of the last completed calculation.
    pub last_result: N,
}

impl<Op, N: Default> Default for CalculatorState<Op, N> {
    fn default() -> Self {
        Self {
            current: "0".to_string(),
            pending: None,
            last_result: N::default(),
        }
    }
}

impl<Op, N: Default> CalculatorState<Op, N> {
    /// Reset to the initial state, as if Clear was pressed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Text to show in the main display: the operand being typed, or the
    /// pending left operand while the right one is still empty.
    pub fn visible_operand(&self) -> &str {
        match (&self.pending, self.current.is_empty()) {
            (Some(pending), true) => &pending.left,
            (None, true) => "0",
            _ => &self.current,
        }
    }

    /// Move `current` into a new pending operation, or swap the operator of an
    /// existing one when no right operand has been typed yet.
    pub fn record(&mut self, operator: Op) {
        if self.current.is_empty() {
            if let Some(pending) = self.pending.as_mut() {
                pending.operator = operator;
            }
            return;
        }
        let left = std::mem::take(&mut self.current);
        self.pending = Some(PendingOperation { left, operator });
    }

    /// Store an evaluation result as the new operand and drop the pending operation.
    pub fn complete(&mut self, text: String, value: N) {
        self.current = text;
        self.pending = None;
        self.last_result = value;
    }
}
