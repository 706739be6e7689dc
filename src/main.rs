fn main() {
    tablefit::cli::run();
}
