//! # Sale Wizard State
//!
//! Manages the in-progress sale: a three-step flow that gathers the buyer,
//! the animal selection, and the per-category prices before confirming.
//!
//! ## Thread Safety
//! The wizard is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the wizard
//! 2. Only one command should modify the wizard at a time
//! 3. Tauri commands can run concurrently
//!
//! ## Wizard Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Wizard Steps                                    │
//! │                                                                         │
//! │   ┌────────────┐      ┌────────────┐      ┌────────────┐               │
//! │   │   Datos    │ ───► │  Animales  │ ───► │  Precios   │ ──► confirm   │
//! │   │  (buyer,   │ ◄─── │ (selection)│ ◄─── │ (price per │               │
//! │   │comprobante)│      │            │      │  category) │               │
//! │   └────────────┘      └────────────┘      └────────────┘               │
//! │                                                                         │
//! │   A step only advances when its data is complete:                       │
//! │   • Datos:    a buyer is selected                                       │
//! │   • Animales: at least one lot selected                                 │
//! │   • Precios:  every category in the selection has a price               │
//! │                                                                         │
//! │   Going BACK is always allowed and loses nothing.                       │
//! │                                                                         │
//! │   NOTE: All write operations acquire the Mutex lock exclusively.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use hacienda_core::{
    compute_totals, Animal, AnimalState, Comprobante, CoreResult, Money, PriceList, SaleLine,
    Totals, ValidationError, MAX_SALE_LOTS,
};

/// The three steps of the sale wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Buyer and comprobante selection.
    Datos,
    /// Animal lot selection.
    Animales,
    /// Per-category pricing.
    Precios,
}

/// An animal selected into the sale.
///
/// ## Design Notes
/// - `animal_id`: Reference to the animal (for database lookup)
/// - tag/category/weight: Frozen copy of animal data at selection time.
///   This ensures the wizard displays consistent data even if the animal
///   record is updated in the database mid-flow; the frozen weight is
///   what the sale is priced on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardLot {
    /// Animal ID (UUID)
    pub animal_id: String,

    /// Ear-tag at selection time (frozen)
    pub tag: String,

    /// Pricing category at selection time (frozen)
    pub category: String,

    /// Weight in whole kilograms at selection time (frozen)
    pub weight_kg: i64,
}

impl WizardLot {
    /// Creates a lot from an animal record, freezing its data.
    pub fn from_animal(animal: &Animal) -> Self {
        WizardLot {
            animal_id: animal.id.clone(),
            tag: animal.tag.clone(),
            category: animal.category.clone(),
            weight_kg: animal.weight_kg,
        }
    }
}

/// The in-progress sale.
///
/// ## Invariants
/// - Lots are unique by `animal_id` (an animal can be in the sale once)
/// - Maximum lots: configured in hacienda-core
/// - A step only advances when valid; totals are only computable when
///   every selected category has a price
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleWizard {
    /// Current step
    pub step: WizardStep,

    /// Selected buyer (Party id)
    pub buyer_id: Option<String>,

    /// Fiscal document class for the sale
    pub comprobante: Comprobante,

    /// Selected animal lots
    pub lots: Vec<WizardLot>,

    /// Per-category prices entered in the Precios step
    pub prices: PriceList,
}

impl SaleWizard {
    /// Creates a fresh wizard at the first step.
    pub fn new(comprobante: Comprobante) -> Self {
        SaleWizard {
            step: WizardStep::Datos,
            buyer_id: None,
            comprobante,
            lots: Vec::new(),
            prices: PriceList::new(),
        }
    }

    /// Selects the buyer for the sale.
    pub fn set_buyer(&mut self, buyer_id: impl Into<String>) {
        self.buyer_id = Some(buyer_id.into());
    }

    /// Changes the comprobante class (affects IVA).
    pub fn set_comprobante(&mut self, comprobante: Comprobante) {
        self.comprobante = comprobante;
    }

    /// Adds an animal to the selection.
    ///
    /// ## Behavior
    /// - Rejects animals that are not in `Available` state
    /// - Adding the same animal twice is a no-op error
    /// - Rejects when the lot cap is reached
    pub fn add_animal(&mut self, animal: &Animal) -> Result<(), String> {
        if animal.state != AnimalState::Available {
            return Err(format!("Animal {} is not available for sale", animal.tag));
        }

        if self.lots.iter().any(|l| l.animal_id == animal.id) {
            return Err(format!("Animal {} is already in the sale", animal.tag));
        }

        if self.lots.len() >= MAX_SALE_LOTS {
            return Err(format!("Sale cannot have more than {} lots", MAX_SALE_LOTS));
        }

        self.lots.push(WizardLot::from_animal(animal));
        Ok(())
    }

    /// Removes an animal from the selection by id.
    pub fn remove_animal(&mut self, animal_id: &str) -> Result<(), String> {
        let initial_len = self.lots.len();
        self.lots.retain(|l| l.animal_id != animal_id);

        if self.lots.len() == initial_len {
            Err(format!("Animal {} is not in the sale", animal_id))
        } else {
            Ok(())
        }
    }

    /// Sets the price per kilogram for a category.
    pub fn set_price(&mut self, category: &str, price: Money) -> Result<(), ValidationError> {
        self.prices.set(category, price)
    }

    /// Distinct categories in the current selection, in stable order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.lots.iter().map(|l| l.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Whether the current step's data is complete.
    pub fn step_valid(&self) -> bool {
        match self.step {
            WizardStep::Datos => self.buyer_id.is_some(),
            WizardStep::Animales => !self.lots.is_empty(),
            WizardStep::Precios => self.totals().is_ok(),
        }
    }

    /// Advances to the next step, refusing if the current one is incomplete.
    pub fn next_step(&mut self) -> Result<WizardStep, String> {
        if !self.step_valid() {
            return Err(match self.step {
                WizardStep::Datos => "Select a buyer before continuing".to_string(),
                WizardStep::Animales => "Select at least one animal".to_string(),
                WizardStep::Precios => "Every category needs a price".to_string(),
            });
        }

        self.step = match self.step {
            WizardStep::Datos => WizardStep::Animales,
            WizardStep::Animales => WizardStep::Precios,
            WizardStep::Precios => {
                return Err("Already at the last step; confirm the sale instead".to_string())
            }
        };
        Ok(self.step)
    }

    /// Goes back one step. Always allowed, loses nothing.
    pub fn prev_step(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Datos => WizardStep::Datos,
            WizardStep::Animales => WizardStep::Datos,
            WizardStep::Precios => WizardStep::Animales,
        };
        self.step
    }

    /// Computes the sale totals from the current selection and prices.
    ///
    /// Fails with `MissingCategoryPrice` while any selected category has
    /// no price; the Precios step is not valid until this succeeds.
    pub fn totals(&self) -> CoreResult<Totals> {
        let lines: Vec<SaleLine> = self
            .lots
            .iter()
            .map(|l| SaleLine::new(l.category.clone(), l.weight_kg))
            .collect();
        compute_totals(&lines, &self.prices, self.comprobante)
    }

    /// Clears everything and returns to the first step.
    pub fn reset(&mut self, comprobante: Comprobante) {
        *self = SaleWizard::new(comprobante);
    }
}

/// Tauri-managed wizard state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<SaleWizard>>` because:
/// - `Arc`: Allows shared ownership across threads
/// - `Mutex`: Ensures only one thread modifies the wizard at a time
///
/// ## Why Not RwLock?
/// Wizard operations are typically quick, and most operations modify state.
/// A RwLock would add complexity with minimal benefit.
#[derive(Debug)]
pub struct WizardState {
    wizard: Arc<Mutex<SaleWizard>>,
}

impl WizardState {
    /// Creates a new empty wizard state.
    pub fn new() -> Self {
        WizardState {
            wizard: Arc::new(Mutex::new(SaleWizard::new(Comprobante::A))),
        }
    }

    /// Executes a function with read access to the wizard.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = wizard_state.with_wizard(|w| w.totals());
    /// ```
    pub fn with_wizard<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SaleWizard) -> R,
    {
        let wizard = self.wizard.lock().expect("Wizard mutex poisoned");
        f(&wizard)
    }

    /// Executes a function with write access to the wizard.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// wizard_state.with_wizard_mut(|w| w.add_animal(&animal))?;
    /// ```
    pub fn with_wizard_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SaleWizard) -> R,
    {
        let mut wizard = self.wizard.lock().expect("Wizard mutex poisoned");
        f(&mut wizard)
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_animal(id: &str, category: &str, weight_kg: i64) -> Animal {
        let now = Utc::now();
        Animal {
            id: id.to_string(),
            tag: format!("AR{}", id),
            category: category.to_string(),
            weight_kg,
            state: AnimalState::Available,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_wizard_happy_path() {
        let mut wizard = SaleWizard::new(Comprobante::B);

        // Datos: needs a buyer
        assert!(wizard.next_step().is_err());
        wizard.set_buyer("p-1");
        assert_eq!(wizard.next_step().unwrap(), WizardStep::Animales);

        // Animales: needs at least one lot
        assert!(wizard.next_step().is_err());
        wizard.add_animal(&test_animal("1", "Novillo", 300)).unwrap();
        assert_eq!(wizard.next_step().unwrap(), WizardStep::Precios);

        // Precios: needs every category priced
        assert!(wizard.next_step().is_err());
        wizard
            .set_price("Novillo", Money::from_pesos(450))
            .unwrap();
        assert!(wizard.step_valid());

        let totals = wizard.totals().unwrap();
        assert_eq!(totals.subtotal.pesos(), 135_000);
        assert_eq!(totals.tax, Money::zero());
    }

    #[test]
    fn test_wizard_rejects_duplicate_animal() {
        let mut wizard = SaleWizard::new(Comprobante::A);
        let animal = test_animal("1", "Novillo", 300);

        wizard.add_animal(&animal).unwrap();
        assert!(wizard.add_animal(&animal).is_err());
        assert_eq!(wizard.lots.len(), 1);
    }

    #[test]
    fn test_wizard_rejects_sold_animal() {
        let mut wizard = SaleWizard::new(Comprobante::A);
        let mut animal = test_animal("1", "Novillo", 300);
        animal.state = AnimalState::Sold;

        assert!(wizard.add_animal(&animal).is_err());
        assert!(wizard.lots.is_empty());
    }

    #[test]
    fn test_wizard_remove_animal() {
        let mut wizard = SaleWizard::new(Comprobante::A);
        wizard.add_animal(&test_animal("1", "Novillo", 300)).unwrap();
        wizard.add_animal(&test_animal("2", "Vaca", 400)).unwrap();

        wizard.remove_animal("1").unwrap();
        assert_eq!(wizard.lots.len(), 1);
        assert_eq!(wizard.lots[0].animal_id, "2");

        assert!(wizard.remove_animal("1").is_err());
    }

    #[test]
    fn test_wizard_categories_deduplicated() {
        let mut wizard = SaleWizard::new(Comprobante::A);
        wizard.add_animal(&test_animal("1", "Novillo", 300)).unwrap();
        wizard.add_animal(&test_animal("2", "Novillo", 280)).unwrap();
        wizard.add_animal(&test_animal("3", "Vaca", 400)).unwrap();

        assert_eq!(wizard.categories(), vec!["Novillo", "Vaca"]);
    }

    #[test]
    fn test_wizard_back_never_fails() {
        let mut wizard = SaleWizard::new(Comprobante::A);
        assert_eq!(wizard.prev_step(), WizardStep::Datos);

        wizard.set_buyer("p-1");
        wizard.next_step().unwrap();
        assert_eq!(wizard.prev_step(), WizardStep::Datos);
        // Buyer survives the round trip
        assert_eq!(wizard.buyer_id.as_deref(), Some("p-1"));
    }

    #[test]
    fn test_wizard_totals_missing_price() {
        let mut wizard = SaleWizard::new(Comprobante::A);
        wizard.set_buyer("p-1");
        wizard.add_animal(&test_animal("1", "Novillo", 300)).unwrap();
        wizard.add_animal(&test_animal("2", "Ternero", 150)).unwrap();
        wizard
            .set_price("Novillo", Money::from_pesos(450))
            .unwrap();

        // Ternero has no price: totals must abort, not average
        assert!(wizard.totals().is_err());
    }

    #[test]
    fn test_wizard_reset() {
        let mut wizard = SaleWizard::new(Comprobante::A);
        wizard.set_buyer("p-1");
        wizard.add_animal(&test_animal("1", "Novillo", 300)).unwrap();
        wizard.next_step().unwrap();

        wizard.reset(Comprobante::B);
        assert_eq!(wizard.step, WizardStep::Datos);
        assert!(wizard.buyer_id.is_none());
        assert!(wizard.lots.is_empty());
        assert_eq!(wizard.comprobante, Comprobante::B);
    }
}
