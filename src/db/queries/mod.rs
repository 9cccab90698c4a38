pub mod training_cycles;
