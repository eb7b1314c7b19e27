//! Flaw repair: grow a pattern, merge two patterns, or blacklist a variable.

use super::*;

/// True iff `a * b <= limit` without overflowing. Fails closed: a product
/// that overflows u64 never fits any limit.
pub(crate) fn is_product_within_limit(a: u64, b: u64, limit: u64) -> bool {
    a.checked_mul(b).is_some_and(|product| product <= limit)
}

impl Cegar<'_> {
    fn pdb_size(&self, index: usize) -> u64 {
        self.solutions[index]
            .as_ref()
            .map_or(0, |solution| solution.pdb().size())
    }

    /// Pick one flaw uniformly at random and repair it. Consumes exactly one
    /// RNG sample.
    pub(crate) fn refine(&mut self, flaws: &[Flaw]) -> Result<(), GenerationError> {
        debug_assert!(!flaws.is_empty());
        let flaw = flaws[self.rng.gen_range(0..flaws.len())];
        if self.options.verbosity >= Verbosity::Verbose {
            debug!(
                slot = flaw.solution_index,
                var = flaw.variable,
                "chosen flaw"
            );
        }
        self.handle_flaw(flaw)
    }

    pub(crate) fn handle_flaw(&mut self, flaw: Flaw) -> Result<(), GenerationError> {
        let Flaw {
            solution_index,
            variable,
        } = flaw;
        let mut repaired = false;

        if let Some(&other_index) = self.lookup.get(&variable) {
            // The variable already lives in another pattern; the only way to
            // cover the flaw is to merge the two patterns.
            debug_assert_ne!(other_index, solution_index);
            if self.options.verbosity >= Verbosity::Verbose {
                debug!(var = variable, other_slot = other_index, "variable already in a pattern");
            }
            if self.can_merge_patterns(solution_index, other_index) {
                self.merge_patterns(solution_index, other_index)?;
                repaired = true;
            }
        } else {
            // The variable is not in the collection yet. It may be a goal
            // variable; it is still added to the flawed pattern rather than
            // to a fresh singleton.
            if self.options.verbosity >= Verbosity::Verbose {
                debug!(var = variable, "variable not in the collection yet");
            }
            if self.can_add_variable_to_pattern(solution_index, variable) {
                self.add_variable_to_pattern(solution_index, variable)?;
                repaired = true;
            }
        }

        if !repaired {
            if self.options.verbosity >= Verbosity::Verbose {
                debug!(var = variable, "size limits forbid growth, blacklisting");
            }
            self.blacklist.insert(variable);
        }
        Ok(())
    }

    pub(crate) fn can_merge_patterns(&self, index1: usize, index2: usize) -> bool {
        let size1 = self.pdb_size(index1);
        let size2 = self.pdb_size(index2);
        if !is_product_within_limit(size1, size2, self.options.max_pdb_size) {
            return false;
        }
        // The merged PDB replaces both operands in the collection total.
        let remaining = self.collection_size - size1 - size2;
        remaining
            .checked_add(size1 * size2)
            .is_some_and(|total| total <= self.options.max_collection_size)
    }

    /// Merge the pattern at `absorbed` into the pattern at `index`. The
    /// absorbed slot becomes a tombstone and its index is never reused.
    pub(crate) fn merge_patterns(
        &mut self,
        index: usize,
        absorbed: usize,
    ) -> Result<(), GenerationError> {
        let (Some(keeper), Some(other)) = (
            self.solutions[index].as_ref(),
            self.solutions[absorbed].as_ref(),
        ) else {
            return Ok(());
        };
        let new_pattern = keeper.pattern().union(other.pattern());
        let absorbed_vars = other.pattern().variables().to_vec();
        for var in absorbed_vars {
            self.lookup.insert(var, index);
        }

        let size1 = self.pdb_size(index);
        let size2 = self.pdb_size(absorbed);
        let merged = AbstractSolution::new(
            self.task,
            new_pattern,
            &mut self.rng,
            self.options.wildcard_plans,
            self.options.verbosity,
        )?;
        self.collection_size = self.collection_size - size1 - size2 + merged.pdb().size();
        self.solutions[index] = Some(merged);
        self.solutions[absorbed] = None;
        Ok(())
    }

    pub(crate) fn can_add_variable_to_pattern(&self, index: usize, var: VariableId) -> bool {
        let size = self.pdb_size(index);
        let domain = self.task.domain_size(var) as u64;
        if !is_product_within_limit(size, domain, self.options.max_pdb_size) {
            return false;
        }
        // The grown PDB replaces the old one in the collection total.
        let remaining = self.collection_size - size;
        remaining
            .checked_add(size * domain)
            .is_some_and(|total| total <= self.options.max_collection_size)
    }

    pub(crate) fn add_variable_to_pattern(
        &mut self,
        index: usize,
        var: VariableId,
    ) -> Result<(), GenerationError> {
        let Some(solution) = self.solutions[index].as_ref() else {
            return Ok(());
        };
        let new_pattern = solution.pattern().with_variable(var);
        let old_size = solution.pdb().size();
        let new_solution = AbstractSolution::new(
            self.task,
            new_pattern,
            &mut self.rng,
            self.options.wildcard_plans,
            self.options.verbosity,
        )?;
        self.collection_size = self.collection_size - old_size + new_solution.pdb().size();
        self.lookup.insert(var, index);
        self.update_goals(var);
        self.solutions[index] = Some(new_solution);
        Ok(())
    }

    /// Seed a fresh singleton pattern for `var`, exempt from size budgets.
    pub(crate) fn add_pattern_for_var(&mut self, var: VariableId) -> Result<(), GenerationError> {
        let solution = AbstractSolution::new(
            self.task,
            Pattern::singleton(var),
            &mut self.rng,
            self.options.wildcard_plans,
            self.options.verbosity,
        )?;
        self.lookup.insert(var, self.solutions.len());
        self.collection_size += solution.pdb().size();
        self.solutions.push(Some(solution));
        Ok(())
    }

    /// Remove `var` from the remaining-goals worklist once it is part of
    /// some pattern.
    pub(crate) fn update_goals(&mut self, var: VariableId) {
        self.remaining_goals.retain(|&goal| goal != var);
    }
}
