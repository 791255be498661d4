mod generate_e2e;
mod providers;
