use crate::app::forms::{SimpleOrderForm, UserOrderForm};
use crate::domain::model::MoveRequest;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "move-estimator")]
#[command(about = "Estimate the price of a household move")]
pub struct CliConfig {
    /// Path to the rate table (TOML)
    #[arg(long, default_value = "rates.toml")]
    pub rates: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Print results and logs as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Estimate a move between two postal codes (or prefectures with --region)
    Quote(QuoteArgs),
    /// Estimate between prefectures and register the accepted order
    Order(OrderArgs),
    /// List the prefectures in the rate table
    Regions,
}

#[derive(Debug, Clone, Args)]
pub struct ItemArgs {
    #[arg(long = "box", default_value = "0")]
    pub boxes: String,

    #[arg(long, default_value = "0")]
    pub bed: String,

    #[arg(long, default_value = "0")]
    pub bicycle: String,

    #[arg(long, default_value = "0")]
    pub washing_machine: String,

    #[arg(long, help = "Request washing machine installation")]
    pub install_washing_machine: bool,

    /// Moving date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// Origin postal code, or prefecture id with --region
    #[arg(long)]
    pub from: String,

    /// Destination postal code, or prefecture id with --region
    #[arg(long)]
    pub to: String,

    #[arg(long, help = "Treat --from/--to as prefecture ids")]
    pub region: bool,

    #[command(flatten)]
    pub items: ItemArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OrderArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub tel: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub from_prefecture: String,

    #[arg(long)]
    pub from_address: String,

    #[arg(long)]
    pub to_prefecture: String,

    #[arg(long)]
    pub to_address: String,

    #[arg(long, default_value = "./orders")]
    pub output_path: String,

    #[command(flatten)]
    pub items: ItemArgs,
}

impl QuoteArgs {
    pub fn to_simple_form(&self) -> SimpleOrderForm {
        SimpleOrderForm {
            old_postal_code: self.from.clone(),
            new_postal_code: self.to.clone(),
            boxes: self.items.boxes.clone(),
            bed: self.items.bed.clone(),
            bicycle: self.items.bicycle.clone(),
            washing_machine: self.items.washing_machine.clone(),
            washing_machine_installation: self.items.install_washing_machine,
            moving_date: self.items.date.clone(),
        }
    }

    pub fn to_move_request(&self) -> Result<MoveRequest> {
        if !self.region {
            return self.to_simple_form().to_move_request();
        }
        let mut form = UserOrderForm::from_simple(&self.to_simple_form());
        form.old_prefecture_id = self.from.clone();
        form.new_prefecture_id = self.to.clone();
        form.to_move_request()
    }
}

impl OrderArgs {
    pub fn to_user_form(&self) -> UserOrderForm {
        UserOrderForm {
            customer_name: self.name.clone(),
            tel: self.tel.clone(),
            email: self.email.clone(),
            old_prefecture_id: self.from_prefecture.clone(),
            old_address: self.from_address.clone(),
            new_prefecture_id: self.to_prefecture.clone(),
            new_address: self.to_address.clone(),
            old_postal_code: String::new(),
            new_postal_code: String::new(),
            moving_date: self.items.date.clone(),
            boxes: self.items.boxes.clone(),
            bed: self.items.bed.clone(),
            bicycle: self.items.bicycle.clone(),
            washing_machine: self.items.washing_machine.clone(),
            washing_machine_installation: self.items.install_washing_machine,
        }
    }
}
