mod app_config;
mod boot;
mod dom_page;
mod page_runtime;

fn main() {
    boot::start();
}
