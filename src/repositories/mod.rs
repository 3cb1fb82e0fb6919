pub mod devis;

pub use devis::DevisRepository;
