fn main() {
    cdt_toolchain_tester::cli::run();
}
