use crate::core::{AdditionalPot, DbPension, GrowthRate, PlanParameters, ProjectionResult, project};
use crate::error::PlanError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: Option<u32>,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl IdSequence {
    /// Resumes after the highest id already in use.
    pub fn after<I: IntoIterator<Item = u32>>(ids: I) -> Self {
        let next = ids.into_iter().max().map_or(Some(1), |max| max.checked_add(1));
        Self { next }
    }

    pub fn next_id(&mut self) -> Result<u32, PlanError> {
        let id = self.next.ok_or(PlanError::IdsExhausted)?;
        self.next = id.checked_add(1);
        Ok(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanSession {
    params: PlanParameters,
    pot_ids: IdSequence,
    db_ids: IdSequence,
}

impl Default for PlanSession {
    fn default() -> Self {
        Self::new(PlanParameters::default())
    }
}

impl PlanSession {
    pub fn new(params: PlanParameters) -> Self {
        let pot_ids = IdSequence::after(params.additional_pots.iter().map(|p| p.id));
        let db_ids = IdSequence::after(params.db_pensions.iter().map(|d| d.id));
        Self {
            params,
            pot_ids,
            db_ids,
        }
    }

    pub fn params(&self) -> &PlanParameters {
        &self.params
    }

    pub fn project(&self) -> Option<ProjectionResult> {
        project(&self.params)
    }

    pub fn edit<F: FnOnce(&mut PlanParameters)>(&mut self, f: F) {
        f(&mut self.params);
        self.params.desired_income = None;
    }

    /// Switching growth preset keeps the override.
    pub fn set_growth_rate(&mut self, growth_rate: GrowthRate) {
        self.params.growth_rate = growth_rate;
    }

    pub fn set_desired_income(&mut self, income: f64) {
        self.params.desired_income = (income > 0.0).then_some(income);
    }

    pub fn clear_desired_income(&mut self) {
        self.params.desired_income = None;
    }

    pub fn add_pot(&mut self) -> Result<u32, PlanError> {
        let id = self.pot_ids.next_id()?;
        self.edit(|p| {
            p.additional_pots.push(AdditionalPot {
                id,
                name: format!("Pension pot {id}"),
                value: 0.0,
                monthly_contribution: 0.0,
            })
        });
        Ok(id)
    }

    pub fn update_pot(
        &mut self,
        id: u32,
        value: f64,
        monthly_contribution: f64,
    ) -> Result<(), PlanError> {
        let pot = self
            .params
            .additional_pots
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PlanError::UnknownPot(id))?;
        pot.value = value;
        pot.monthly_contribution = monthly_contribution;
        self.params.desired_income = None;
        Ok(())
    }

    pub fn remove_pot(&mut self, id: u32) -> Result<(), PlanError> {
        let before = self.params.additional_pots.len();
        self.params.additional_pots.retain(|p| p.id != id);
        if self.params.additional_pots.len() == before {
            return Err(PlanError::UnknownPot(id));
        }
        self.params.desired_income = None;
        Ok(())
    }

    pub fn add_db_pension(&mut self) -> Result<u32, PlanError> {
        let id = self.db_ids.next_id()?;
        let start_age = self.params.retirement_age;
        self.edit(|p| {
            p.db_pensions.push(DbPension {
                id,
                provider: String::new(),
                annual_income: 0.0,
                start_age,
            })
        });
        Ok(id)
    }

    pub fn update_db_pension(
        &mut self,
        id: u32,
        provider: &str,
        annual_income: f64,
        start_age: u32,
    ) -> Result<(), PlanError> {
        let db = self
            .params
            .db_pensions
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(PlanError::UnknownDbPension(id))?;
        db.provider = provider.to_string();
        db.annual_income = annual_income;
        db.start_age = start_age;
        self.params.desired_income = None;
        Ok(())
    }

    pub fn remove_db_pension(&mut self, id: u32) -> Result<(), PlanError> {
        let before = self.params.db_pensions.len();
        self.params.db_pensions.retain(|d| d.id != id);
        if self.params.db_pensions.len() == before {
            return Err(PlanError::UnknownDbPension(id));
        }
        self.params.desired_income = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_per_session_and_never_reused() {
        let mut a = PlanSession::default();
        let mut b = PlanSession::default();
        assert_eq!(a.add_pot().expect("id available"), 1);
        assert_eq!(a.add_pot().expect("id available"), 2);
        assert_eq!(b.add_pot().expect("id available"), 1);

        a.remove_pot(2).expect("pot exists");
        assert_eq!(a.add_pot().expect("id available"), 3);
        assert_eq!(a.add_db_pension().expect("id available"), 1);
    }

    #[test]
    fn sequence_resumes_after_existing_ids() {
        let mut params = PlanParameters::default();
        params.db_pensions.push(DbPension {
            id: 7,
            provider: "Police".into(),
            annual_income: 9_000.0,
            start_age: 60,
        });
        let mut session = PlanSession::new(params);
        assert_eq!(session.add_db_pension().expect("id available"), 8);
        assert_eq!(session.add_pot().expect("id available"), 1);
    }

    #[test]
    fn highest_possible_id_exhausts_the_sequence_without_panicking() {
        let mut params = PlanParameters::default();
        params.additional_pots.push(AdditionalPot {
            id: u32::MAX,
            name: "Legacy".into(),
            value: 1_000.0,
            monthly_contribution: 0.0,
        });
        params.desired_income = Some(20_000.0);
        let mut session = PlanSession::new(params);

        assert_eq!(session.add_pot(), Err(PlanError::IdsExhausted));
        assert_eq!(session.params().additional_pots.len(), 1);
        assert_eq!(session.params().desired_income, Some(20_000.0));
        assert_eq!(session.add_db_pension(), Ok(1));

        let mut seq = IdSequence::after([u32::MAX - 1]);
        assert_eq!(seq.next_id(), Ok(u32::MAX));
        assert_eq!(seq.next_id(), Err(PlanError::IdsExhausted));
    }

    #[test]
    fn new_entities_get_default_names_and_ages() {
        let mut session = PlanSession::default();
        let pot_id = session.add_pot().expect("id available");
        let db_id = session.add_db_pension().expect("id available");
        let params = session.params();
        assert_eq!(params.additional_pots[0].name, format!("Pension pot {pot_id}"));
        assert_eq!(params.additional_pots[0].value, 0.0);
        assert_eq!(params.db_pensions[0].id, db_id);
        assert_eq!(params.db_pensions[0].start_age, params.retirement_age);
    }

    #[test]
    fn edits_clear_the_income_override() {
        let mut session = PlanSession::default();
        session.set_desired_income(30_000.0);
        assert_eq!(session.params().desired_income, Some(30_000.0));

        session.edit(|p| p.annual_salary = 40_000.0);
        assert_eq!(session.params().desired_income, None);
        assert_eq!(session.params().annual_salary, 40_000.0);

        let id = session.add_pot().expect("id available");
        session.set_desired_income(30_000.0);
        session.update_pot(id, 1_000.0, 50.0).expect("pot exists");
        assert_eq!(session.params().desired_income, None);

        session.set_desired_income(30_000.0);
        session.edit(|p| p.take_lump_sum = true);
        assert_eq!(session.params().desired_income, None);
    }

    #[test]
    fn growth_preset_change_keeps_the_override() {
        let mut session = PlanSession::default();
        session.set_desired_income(25_000.0);
        session.set_growth_rate(GrowthRate::Optimistic);
        assert_eq!(session.params().desired_income, Some(25_000.0));
        assert_eq!(session.params().growth_rate, GrowthRate::Optimistic);
    }

    #[test]
    fn non_positive_income_clears_the_override() {
        let mut session = PlanSession::default();
        session.set_desired_income(25_000.0);
        session.set_desired_income(0.0);
        assert_eq!(session.params().desired_income, None);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut session = PlanSession::default();
        assert_eq!(session.remove_pot(4), Err(PlanError::UnknownPot(4)));
        assert_eq!(
            session.update_db_pension(2, "x", 1.0, 60),
            Err(PlanError::UnknownDbPension(2))
        );
    }

    #[test]
    fn project_uses_the_override_until_an_edit() {
        let mut session = PlanSession::default();
        session.set_desired_income(50_000.0);
        let result = session.project().expect("valid");
        assert_eq!(result.display_income, 50_000.0);

        session.edit(|p| p.inflation_rate = 2.0);
        let result = session.project().expect("valid");
        assert_eq!(result.display_income, result.sustainable_income);
    }
}
