pub mod devis;

pub use devis::{
    create_devis, devis_test, my_devis, CreateDevisRequest, CreateDevisResponse,
    DevisListResponse, DevisSummaryResponse, LivenessResponse,
};
