/// A group of parameters sharing one learning rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGroup {
    /// Rate the group was configured with. Schedules scale this value.
    pub base_lr: f64,
    /// Rate the optimizer actually uses on its next step.
    pub lr: f64,
}

impl ParamGroup {
    pub fn new(lr: f64) -> Self {
        ParamGroup { base_lr: lr, lr }
    }
}

/// The part of an optimizer a learning-rate scheduler needs: its parameter groups.
pub trait Optimizer {
    fn param_groups(&self) -> &[ParamGroup];
    fn param_groups_mut(&mut self) -> &mut [ParamGroup];

    /// Effective rate of every group, in order.
    fn lrs(&self) -> Vec<f64> {
        self.param_groups().iter().map(|g| g.lr).collect()
    }
}

/// Minimal optimizer holding only parameter-group rates.
///
/// Useful as a stand-in when an external optimizer owns the parameters and
/// reads its rates from here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LrGroups {
    groups: Vec<ParamGroup>,
}

impl LrGroups {
    pub fn new(groups: Vec<ParamGroup>) -> Self {
        LrGroups { groups }
    }

    /// One group per base rate.
    pub fn from_lrs(lrs: &[f64]) -> Self {
        Self::new(lrs.iter().map(|&lr| ParamGroup::new(lr)).collect())
    }

    pub fn add_group(mut self, lr: f64) -> Self {
        self.groups.push(ParamGroup::new(lr));
        self
    }

    pub fn len(&self) -> usize { self.groups.len() }

    pub fn is_empty(&self) -> bool { self.groups.is_empty() }
}

impl Optimizer for LrGroups {
    fn param_groups(&self) -> &[ParamGroup] { &self.groups }
    fn param_groups_mut(&mut self) -> &mut [ParamGroup] { &mut self.groups }
}
