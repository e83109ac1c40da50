use crate::domain::model::{ItemCounts, Location, MoveRequest};
use crate::utils::error::Result;
use crate::utils::validation::{
    parse_count, parse_moving_date, require_non_blank, validate_numeric, Validate,
};
use serde::{Deserialize, Serialize};

/// 簡易估價表單，以郵遞區號指定地點
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleOrderForm {
    pub old_postal_code: String,
    pub new_postal_code: String,
    #[serde(rename = "box")]
    pub boxes: String,
    pub bed: String,
    pub bicycle: String,
    pub washing_machine: String,
    pub washing_machine_installation: bool,
    pub moving_date: String,
}

/// 正式申請表單，含客戶資料與都道府縣
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOrderForm {
    pub customer_name: String,
    pub tel: String,
    pub email: String,
    pub old_prefecture_id: String,
    pub old_address: String,
    pub new_prefecture_id: String,
    pub new_address: String,
    pub old_postal_code: String,
    pub new_postal_code: String,
    pub moving_date: String,
    #[serde(rename = "box")]
    pub boxes: String,
    pub bed: String,
    pub bicycle: String,
    pub washing_machine: String,
    pub washing_machine_installation: bool,
}

fn parse_items(
    boxes: &str,
    bed: &str,
    bicycle: &str,
    washing_machine: &str,
) -> Result<ItemCounts> {
    Ok(ItemCounts {
        boxes: parse_count("box", boxes)?,
        bed: parse_count("bed", bed)?,
        bicycle: parse_count("bicycle", bicycle)?,
        washing_machine: parse_count("washing_machine", washing_machine)?,
    })
}

impl SimpleOrderForm {
    pub fn to_move_request(&self) -> Result<MoveRequest> {
        self.validate()?;
        Ok(MoveRequest {
            origin: Location::PostalCode(self.old_postal_code.trim().to_string()),
            destination: Location::PostalCode(self.new_postal_code.trim().to_string()),
            moving_date: parse_moving_date("moving_date", &self.moving_date)?,
            items: parse_items(&self.boxes, &self.bed, &self.bicycle, &self.washing_machine)?,
            washing_machine_installation: self.washing_machine_installation,
        })
    }
}

impl Validate for SimpleOrderForm {
    fn validate(&self) -> Result<()> {
        require_non_blank("old_postal_code", &self.old_postal_code)?;
        require_non_blank("new_postal_code", &self.new_postal_code)?;
        parse_items(&self.boxes, &self.bed, &self.bicycle, &self.washing_machine)?;
        parse_moving_date("moving_date", &self.moving_date)?;
        Ok(())
    }
}

impl UserOrderForm {
    /// 由簡易表單轉換，客戶資料與都道府縣留空
    pub fn from_simple(simple: &SimpleOrderForm) -> Self {
        Self {
            customer_name: String::new(),
            tel: String::new(),
            email: String::new(),
            old_prefecture_id: String::new(),
            old_address: String::new(),
            new_prefecture_id: String::new(),
            new_address: String::new(),
            old_postal_code: simple.old_postal_code.clone(),
            new_postal_code: simple.new_postal_code.clone(),
            moving_date: simple.moving_date.clone(),
            boxes: simple.boxes.clone(),
            bed: simple.bed.clone(),
            bicycle: simple.bicycle.clone(),
            washing_machine: simple.washing_machine.clone(),
            washing_machine_installation: simple.washing_machine_installation,
        }
    }

    pub fn to_simple(&self) -> SimpleOrderForm {
        SimpleOrderForm {
            old_postal_code: self.old_postal_code.clone(),
            new_postal_code: self.new_postal_code.clone(),
            boxes: self.boxes.clone(),
            bed: self.bed.clone(),
            bicycle: self.bicycle.clone(),
            washing_machine: self.washing_machine.clone(),
            washing_machine_installation: self.washing_machine_installation,
            moving_date: self.moving_date.clone(),
        }
    }

    /// 以都道府縣 ID 查距離表
    pub fn to_move_request(&self) -> Result<MoveRequest> {
        validate_numeric("old_prefecture_id", &self.old_prefecture_id)?;
        validate_numeric("new_prefecture_id", &self.new_prefecture_id)?;
        Ok(MoveRequest {
            origin: Location::Region(self.old_prefecture_id.trim().to_string()),
            destination: Location::Region(self.new_prefecture_id.trim().to_string()),
            moving_date: parse_moving_date("moving_date", &self.moving_date)?,
            items: parse_items(&self.boxes, &self.bed, &self.bicycle, &self.washing_machine)?,
            washing_machine_installation: self.washing_machine_installation,
        })
    }
}

impl Validate for UserOrderForm {
    fn validate(&self) -> Result<()> {
        require_non_blank("customer_name", &self.customer_name)?;
        validate_numeric("tel", &self.tel.replace('-', ""))?;
        let email = require_non_blank("email", &self.email)?;
        if !email.contains('@') {
            return Err(crate::utils::error::EstimateError::invalid_input(
                "email",
                email,
                "not an email address",
            ));
        }
        require_non_blank("old_address", &self.old_address)?;
        require_non_blank("new_address", &self.new_address)?;
        self.to_move_request().map(|_| ())
    }
}
