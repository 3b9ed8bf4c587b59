pub mod rotation_pipeline;
