//! 轮胎状态

use contracts::TyreCompound;

/// 当前轮胎配方与胎龄
///
/// 胎龄即下一条 LapRecord 将携带的值：换胎后重置为 1，每封存一圈加 1。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TyreState {
    compound: TyreCompound,
    age: u32,
}

impl TyreState {
    pub fn new(compound: TyreCompound) -> Self {
        Self { compound, age: 1 }
    }

    pub fn compound(&self) -> TyreCompound {
        self.compound
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// 观察到一个配方；不同于当前配方时返回 `(from, to)` 并重置胎龄
    pub fn observe(&mut self, compound: TyreCompound) -> Option<(TyreCompound, TyreCompound)> {
        if compound == self.compound {
            return None;
        }
        let from = self.compound;
        self.compound = compound;
        self.age = 1;
        Some((from, compound))
    }

    /// 封存一圈：返回该圈携带的 (配方, 胎龄)，然后胎龄加 1
    pub fn complete_lap(&mut self) -> (TyreCompound, u32) {
        let snapshot = (self.compound, self.age);
        self.age += 1;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_increments_per_lap() {
        let mut tyres = TyreState::new(TyreCompound::Soft);
        assert_eq!(tyres.complete_lap(), (TyreCompound::Soft, 1));
        assert_eq!(tyres.complete_lap(), (TyreCompound::Soft, 2));
        assert_eq!(tyres.age(), 3);
    }

    #[test]
    fn test_same_compound_is_not_a_change() {
        let mut tyres = TyreState::new(TyreCompound::Medium);
        tyres.complete_lap();
        assert_eq!(tyres.observe(TyreCompound::Medium), None);
        assert_eq!(tyres.age(), 2);
    }

    #[test]
    fn test_change_resets_age() {
        let mut tyres = TyreState::new(TyreCompound::Soft);
        tyres.complete_lap();
        tyres.complete_lap();
        assert_eq!(
            tyres.observe(TyreCompound::Hard),
            Some((TyreCompound::Soft, TyreCompound::Hard))
        );
        assert_eq!(tyres.compound(), TyreCompound::Hard);
        assert_eq!(tyres.age(), 1);
    }
}
